// Prompt text served by the `analyse_data` MCP prompt. No network call is involved;
// the caller's model performs the rewrite.

/// Instruction placed before the job description.
pub const ANALYSE_DATA_PREAMBLE: &str = "你将收到一段岗位描述和一段简历内容的结构化数据，\
请根据岗位描述的内容对简历中的工作经验、项目经验、个人介绍、技能特长等部分进行改写润色: \n";

/// Separator between the job description and the resume structure.
pub const ANALYSE_DATA_RESUME_HEADER: &str = "\n简历内容如下: \n";

/// Builds the JD-guided rewrite instruction. Both inputs are embedded verbatim.
pub fn render_analyse_prompt(recognize_data: &str, jd: &str) -> String {
    let mut prompt = String::with_capacity(
        ANALYSE_DATA_PREAMBLE.len() + jd.len() + ANALYSE_DATA_RESUME_HEADER.len() + recognize_data.len(),
    );
    prompt.push_str(ANALYSE_DATA_PREAMBLE);
    prompt.push_str(jd);
    prompt.push_str(ANALYSE_DATA_RESUME_HEADER);
    prompt.push_str(recognize_data);
    prompt
}
