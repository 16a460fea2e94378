mod chat;
mod home;

pub use chat::ChatPage;
pub use home::HomePage;
