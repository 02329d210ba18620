pub mod export;
pub mod stop;
pub mod tag;
pub mod trip;

mod validate;
