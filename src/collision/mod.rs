mod contacts;

pub use self::contacts::{Contact, ContactList};
