//! Resource primitives shared by every engine: currency, stamina and player experience.

pub mod ledger;
pub mod progression;
pub mod stamina;

pub use ledger::{adjust, AdjustOp, Currency};
pub use progression::{add_experience, exp_for_next_level, LevelUp};
pub use stamina::{current_stamina, StaminaReading};
