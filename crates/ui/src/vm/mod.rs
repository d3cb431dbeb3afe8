mod question_vm;
mod result_vm;
mod section_vm;
mod time_fmt;

pub use question_vm::{QuestionVm, RunMode, progress_line, question_heading, score_line, status_strip};
pub use result_vm::ResultVm;
pub use section_vm::{SectionListItemVm, map_section_list, section_detail_lines};
pub use time_fmt::{format_datetime, format_elapsed};
