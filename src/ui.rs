//! UI styling for the desktop shell
//! Dark mode aesthetic with neon pink accents

pub mod theme;
