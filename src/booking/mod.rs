//! Reservation configuration engine: the step wizard, the menu cart, the
//! concurrent table-availability resolver and the final submitter.

pub mod availability;
pub mod cart;
pub mod draft;
pub mod submitter;
pub mod wizard;

pub use availability::*;
pub use cart::*;
pub use draft::*;
pub use submitter::*;
pub use wizard::*;
