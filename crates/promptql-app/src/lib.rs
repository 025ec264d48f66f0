// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod extract;
pub mod model;
pub mod state;
pub mod text_area;

pub use model::*;
pub use state::*;
pub use text_area::TextArea;
