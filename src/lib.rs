//! A distributed, time-ordered 64-bit ID generator inspired by [Twitter's Snowflake].
//!
//! Every ID packs, from the most significant bit:
//!
//! ```text
//! [1 bit: 0][41 bits: milliseconds since epoch][10 bits: machine id][12 bits: sequence]
//! ```
//!
//! The machine ID is hashed from the host's private address, so hosts need no
//! coordinator. Up to 4096 IDs are issued per millisecond; past that the
//! generator spins until the next millisecond.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! ipflake = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use ipflake::Snowflake;
//!
//! let sf = Snowflake::builder()
//!     .machine_id(&|| Ok(42))
//!     .finalize()
//!     .unwrap();
//! let next_id = sf.next_id().unwrap();
//! assert_eq!(ipflake::decompose(next_id).machine_id, 42);
//! ```
//!
//! ## Concurrent use
//!
//! Snowflake is thread-safe. `clone` it before moving to another thread:
//! ```
//! use ipflake::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::builder().machine_id(&|| Ok(1)).finalize().unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! ## Limitations
//!
//! The last issued timestamp lives only in memory. If a restarted process
//! sees a clock that has not passed the previous run's last timestamp, it can
//! reissue IDs that run already handed out.
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

mod builder;
mod clock;
mod encoding;
mod error;
mod machine_id;
mod sequence;
mod snowflake;

pub use crate::snowflake::*;
pub use builder::*;
pub use clock::*;
pub use encoding::*;
pub use error::*;
pub use machine_id::*;
pub use sequence::*;
