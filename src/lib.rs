//! Inbox Intel — conversational email-triage engine.
//!
//! Turns free-text chat utterances into a bounded set of actions against a
//! prioritized, analyzed inbox, and manages the draft → refine → send
//! lifecycle of a reply. Mailbox fetching, LLM prioritization/drafting, and
//! transmission are external collaborators consumed behind the traits in
//! [`collab`].

pub mod chat;
pub mod collab;
pub mod config;
pub mod error;
pub mod inbox;
