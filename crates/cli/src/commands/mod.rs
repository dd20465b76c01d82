pub mod account;
pub mod pick;
pub mod preview;
pub mod scan;
pub mod search;
pub mod upload;

use prismbreak_core::{FileDescriptor, SizeKind, format_file_size};

/// One line describing a discovered file.
pub(crate) fn describe_file(file: &FileDescriptor) -> String {
    let size = match file.size_kind() {
        SizeKind::Exact => format_file_size(file.size_bytes()),
        SizeKind::PixelEstimate => format!("~{} px", file.size_bytes()),
        SizeKind::Unavailable => "size unknown".to_owned(),
    };
    format!(
        "  {id} | {name} | {category} | {size}",
        id = file.id(),
        name = file.name(),
        category = file.category(),
    )
}
