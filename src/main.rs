//! Browser entry point.
#![allow(unused_crate_dependencies)]

use skill_graph::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App)
}
