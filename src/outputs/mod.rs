pub mod files;

pub use files::{deliver_all, segment_file_name, write_merged, write_segment, MERGED_FILE_NAME};
