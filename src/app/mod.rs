// Presentation: turns an explorer snapshot into terminal output.

pub mod render;
