//! Control-flow combinators for flaky, animation-dependent UI steps.
//!
//! - [`fallback::first_success`]: try an ordered list of candidates until one works
//! - [`retry::retry`]: repeat a whole step a bounded number of times with a fixed pause
//!
//! Neither combinator logs; callers decide what an attempt or a miss means.
pub mod fallback;
pub mod retry;

pub use fallback::{Fallback, first_success};
pub use retry::{Exhausted, RetryPolicy, retry};
