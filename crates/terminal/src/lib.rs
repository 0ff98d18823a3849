#![deny(unsafe_code)]

/// Terminal front-end for the Chatter-Box session core.
///
/// Plain lines are sent as messages; `/clear`, `/persist`, `/help` and
/// `/quit` map to the widget's buttons.
pub mod app;
pub mod commands;
/// Settings loaded from the user's config directory.
pub mod settings;
pub mod view;
