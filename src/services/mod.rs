//! Collaborators around the layout engine: event source, reload
//! signalling, agenda listing and configuration

pub mod agenda;
pub mod config;
pub mod event_loader;
pub mod refresh;

pub use agenda::{Agenda, AgendaDay, AgendaPage, PAGE_SIZE};
pub use config::Config;
pub use event_loader::{EventLoaderService, LoadedEvents};
pub use refresh::{DirectoryWatcher, RefreshSignal};
