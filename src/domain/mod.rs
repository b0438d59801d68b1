pub mod table;
pub mod menu;
pub mod reservation;
pub mod notification;

pub use table::*;
pub use menu::*;
pub use reservation::*;
pub use notification::*;
