pub mod use_authentication;
pub mod use_comment_section;
pub mod use_fetch;
pub mod use_logout;
pub mod use_mutation;
pub mod use_paginated_fetch;

pub use crate::contexts::use_api;
pub use use_authentication::use_authentication;
pub use use_comment_section::{SectionHandle, use_comment_section};
pub use use_fetch::use_fetch;
pub use use_logout::use_logout;
pub use use_mutation::use_mutation;
pub use use_paginated_fetch::use_paginated_fetch;
