mod plan;
mod verify;

pub use plan::{PlanArgs, plan};
pub use verify::{VerifyArgs, verify};
