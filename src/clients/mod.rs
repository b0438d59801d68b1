#[macro_use]
mod macros;

mod menu_client;
mod notification_client;
mod reservation_client;
mod table_client;

pub use menu_client::MenuClient;
pub use notification_client::NotificationClient;
pub use reservation_client::ReservationClient;
pub use table_client::TableClient;
