mod documents;
mod helpers;
mod triggers;
