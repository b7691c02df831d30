pub use self::{amova::*, groups::*};

mod amova;
mod distance;
mod groups;
