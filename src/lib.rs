#![no_std]

extern crate alloc;

pub mod config;
pub mod content;
pub mod error;
pub mod frontend;
pub mod gui;
pub mod icons;
pub mod layout;
pub mod obj;
pub mod page;
pub mod paginator;
pub mod refresh;
pub mod touch;
pub mod types;
pub mod use_case;

pub use config::Profile;
pub use error::{NbglError, NbglResult};
pub use gui::Gui;
pub use layout::{Layout, LayoutEvent};
pub use use_case::{UseCaseEvent, UseCases};
