pub mod js_executor;
pub mod session;

pub use js_executor::JsExecutor;
pub use session::{DriverSession, SessionHandle};
