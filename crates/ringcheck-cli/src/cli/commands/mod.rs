mod dispatch;
pub(crate) mod locales;
pub(crate) mod run;
pub(crate) mod validate;

pub use dispatch::dispatch;
