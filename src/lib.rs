pub mod carousel;
pub mod config;
pub mod error;
pub mod events;
pub mod site {
    pub mod accordion;
    pub mod bindings;
    pub mod clipboard;
    pub mod consent;
    pub mod counter;
    pub mod modal;
    pub mod nav;
    pub mod notify;
    pub mod reveal;
    pub mod reviews;
    pub mod scroll;
    pub mod seasonal;
    pub mod skills;
}
pub mod tasks {
    pub mod carousel;
    pub mod contact;
    pub mod files;
    pub mod reviews;
}
