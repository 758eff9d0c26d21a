pub mod aligned_seq_qc;
pub mod ubam_info;

pub use aligned_seq_qc::AlignedSeqQc;
pub use ubam_info::UbamInfo;
