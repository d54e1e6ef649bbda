pub mod comment_form;
pub mod comment_item;
pub mod header;
pub mod load_error;
pub mod modal;
pub mod nested_comments;
pub mod newsletter_form;
pub mod pagination_controls;
pub mod report_dialog;
pub mod timestamp_display;

pub use comment_form::{CommentForm, Submission};
pub use comment_item::CommentItem;
pub use header::Header;
pub use load_error::LoadError;
pub use modal::Modal;
pub use nested_comments::NestedComments;
pub use newsletter_form::NewsletterForm;
pub use pagination_controls::PaginationControls;
pub use report_dialog::ReportDialog;
pub use timestamp_display::TimestampDisplay;
