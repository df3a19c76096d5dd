pub mod attendance_dto;
pub mod completion_dto;
pub mod scan_dto;
