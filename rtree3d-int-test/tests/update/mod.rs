//! Insert and delete through the public tree API.

mod insert_test;
