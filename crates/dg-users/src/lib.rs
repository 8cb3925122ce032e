//! `dg-users` — quiz-game users on top of `dg-behavior`.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                           |
//! |-------------|--------------------------------------------------------------------|
//! | [`kinds`]   | Field / operation / kind names, the `user` and `paidUser` sets     |
//! | [`factory`] | `EntityFactory` trait, `UserFactory`, `PaidUserFactory`, `QuizFactories` |
//!
//! # Quick-start
//!
//! ```rust
//! use dg_core::FactoryConfig;
//! use dg_users::QuizFactories;
//!
//! let quiz = QuizFactories::new(FactoryConfig::default()).unwrap();
//!
//! let mut phil = quiz.users.create("Phil", 4).unwrap();
//! phil.invoke("increment", &[]).unwrap();
//! assert_eq!(phil.int_field("score").unwrap(), 5);
//!
//! let mut alyssa = quiz.paid.create("Alyssa", 8, 25).unwrap();
//! alyssa.invoke("increaseBalance", &[]).unwrap();
//! alyssa.invoke("increment", &[]).unwrap();
//! assert_eq!(alyssa.int_field("accountBalance").unwrap(), 26);
//! assert_eq!(alyssa.int_field("score").unwrap(), 9);
//! ```

pub mod factory;
pub mod kinds;


pub use factory::{EntityFactory, PaidUserFactory, QuizFactories, UserFactory};
pub use kinds::{paid_user_behaviors, quiz_catalog, user_behaviors};
