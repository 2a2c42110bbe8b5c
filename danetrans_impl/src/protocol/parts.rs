// The typed transfer records carried in envelope bodies.

mod block_transfer;
mod download_transfer;
mod test_transfer;

pub use self::{
    block_transfer::{BlockRequest, BlockResponse},
    download_transfer::{DownloadRequest, DownloadResponse},
    test_transfer::{TestRequest, TestResponse},
};
