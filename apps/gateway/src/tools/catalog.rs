use serde_json::json;

use crate::gateway::params::{ResumeColor, WriteScene};

use super::definition::{PromptArgument, PromptDescriptor, ToolDescriptor};

pub const CHECK: &str = "check";
pub const BUILD_RESUME: &str = "build_resume";
pub const MATCH: &str = "match";
pub const INFO: &str = "info";
pub const WRITE: &str = "write";
pub const RECOGNIZE: &str = "recognize";
pub const ANALYSE: &str = "analyse";
pub const RESUME_STYLE_WRITE: &str = "resume_style_write";

pub const ANALYSE_DATA_PROMPT: &str = "analyse_data";

/// Resolves a tool name or one of its accepted aliases to the canonical name.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    match name {
        CHECK => Some(CHECK),
        BUILD_RESUME | "create_resume" => Some(BUILD_RESUME),
        MATCH | "match_resume" => Some(MATCH),
        INFO => Some(INFO),
        WRITE => Some(WRITE),
        RECOGNIZE => Some(RECOGNIZE),
        ANALYSE => Some(ANALYSE),
        RESUME_STYLE_WRITE => Some(RESUME_STYLE_WRITE),
        _ => None,
    }
}

/// Every tool the gateway serves, in listing order.
pub fn tool_catalog() -> Vec<ToolDescriptor> {
    let scenes: Vec<&str> = WriteScene::ALL.iter().map(|s| s.as_str()).collect();
    let colors: Vec<&str> = ResumeColor::ALL.iter().map(|c| c.as_str()).collect();

    vec![
        ToolDescriptor::new(CHECK, "Show the API key this server is configured with."),
        ToolDescriptor::new(
            BUILD_RESUME,
            "Generate a resume document from a free-text request. Only `text` is required; \
             other profile fields may be empty.",
        )
        .with_string("text", "Resume generation request", true)
        .with_string("name", "Candidate name", false)
        .with_string("mobile", "Mobile number", false)
        .with_string("job", "Target position", false)
        .with_string("school", "School", false)
        .with_string("major", "Major", false)
        .with_string("work_year", "Years of experience", false)
        .with_string("company", "Current or last company", false)
        .with_string("gender", "Gender", false)
        .with_string("age", "Age", false),
        ToolDescriptor::new(
            MATCH,
            "Match a resume against a job title and description. Returns an analysis id for `info`.",
        )
        .with_string("job_title", "Job title", true)
        .with_string("job_desc", "Job description", true)
        .with_string("resume_url", "Resume URL", false),
        ToolDescriptor::new(INFO, "Fetch the resume analysis report for an analysis id.")
            .with_string("request_id", "Analysis id returned by `match`", true),
        ToolDescriptor::new(
            WRITE,
            "Rewrite resume text for a given industry, position, and section: polish, expand, \
             refine, continue, or compose from keywords.",
        )
        .with_string("text", "Text to process", true)
        .with_enum(
            "task",
            "1=润色 polish, 2=扩写 expand, 3=精炼 refine, 4=续写 continue, 5=短词成文 compose",
            &["1", "2", "3", "4", "5"],
            true,
        )
        .with_enum("scene", "Resume section", &scenes, true)
        .with_string("job", "Position", false)
        .with_string("industry", "Industry", false)
        .with_enum("channels", "Recruiting channel", &["社会招聘", "校园招聘"], false)
        .with_string("company", "Company name", false),
        ToolDescriptor::new(RECOGNIZE, "Parse a resume file into structured sections.")
            .with_string("file", "Path of the file to upload", true),
        ToolDescriptor::new(
            ANALYSE,
            "Rework recognized resume data (work, projects, summary, skills) to fit a job description.",
        )
        .with_string("recognize_data", "Structured output of `recognize`", true)
        .with_string("jd", "Job description", true),
        ToolDescriptor::new(
            RESUME_STYLE_WRITE,
            "Render a styled resume from a resume structure. Returns the resume URL.",
        )
        .with_enum("color", "Theme color", &colors, true)
        .with_property(
            "modules",
            json!({"type": "object", "description": "Resume structure, e.g. the output of `recognize`"}),
            true,
        ),
    ]
}

/// Every prompt the gateway serves.
pub fn prompt_catalog() -> Vec<PromptDescriptor> {
    vec![PromptDescriptor {
        name: ANALYSE_DATA_PROMPT,
        description: "Instruction for rewriting recognized resume data against a job description.",
        arguments: vec![
            PromptArgument {
                name: "recognize_data",
                description: "Structured output of `recognize`",
                required: true,
            },
            PromptArgument {
                name: "jd",
                description: "Job description",
                required: true,
            },
        ],
    }]
}
