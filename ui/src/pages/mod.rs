pub mod article;
pub mod home;
pub mod not_found;

pub use article::ArticlePage;
pub use home::HomePage;
pub use not_found::NotFoundPage;
