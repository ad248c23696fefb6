mod cookie;

pub use cookie::SessionCookie;
