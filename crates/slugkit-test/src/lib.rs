//! slugkit integration test support.
//!
//! Re-exports the workspace crates under one `component` path and provides
//! the fixtures shared by the integration tests.

#![allow(ambiguous_glob_reexports)]

pub mod component {
    pub use slugkit_core::*;

    pub mod db {
        pub use slugkit_db::db::*;
    }

    pub mod model {
        pub use slugkit_db::model::*;
    }

    pub mod hook {
        pub use slugkit_db::hook::*;
    }

    pub mod error {
        pub use slugkit_core::error::*;
        pub use slugkit_db::error::*;
    }
}

pub mod fixtures;
