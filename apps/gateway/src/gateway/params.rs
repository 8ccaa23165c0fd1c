//! Typed tool arguments and their form encodings.
//!
//! Optional text fields deserialize `null` and missing keys to `""`, and every
//! declared field is always written to the form.

use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::gateway::encoding::encode_form_json;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Like `null_as_default`, but a blank string also selects the default.
fn blank_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(T::default()),
        Some(other) => T::deserialize(other).map_err(serde::de::Error::custom),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Enumerated inputs
// ────────────────────────────────────────────────────────────────────────────

/// Rewrite task for `write`. Sent to the API as its digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTask")]
pub enum WriteTask {
    /// 润色
    Polish,
    /// 扩写
    Expand,
    /// 精炼
    Refine,
    /// 续写
    Continue,
    /// 短词成文
    FromKeywords,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTask {
    Code(u64),
    Text(String),
}

impl TryFrom<RawTask> for WriteTask {
    type Error = String;

    fn try_from(raw: RawTask) -> Result<Self, Self::Error> {
        let text = match raw {
            RawTask::Code(n) => n.to_string(),
            RawTask::Text(s) => s.trim().to_string(),
        };
        match text.as_str() {
            "1" | "润色" | "polish" => Ok(WriteTask::Polish),
            "2" | "扩写" | "expand" => Ok(WriteTask::Expand),
            "3" | "精炼" | "refine" => Ok(WriteTask::Refine),
            "4" | "续写" | "continue" => Ok(WriteTask::Continue),
            "5" | "短词成文" | "keywords" => Ok(WriteTask::FromKeywords),
            other => Err(format!("unknown task '{other}', expected 1-5")),
        }
    }
}

impl WriteTask {
    pub fn code(self) -> &'static str {
        match self {
            WriteTask::Polish => "1",
            WriteTask::Expand => "2",
            WriteTask::Refine => "3",
            WriteTask::Continue => "4",
            WriteTask::FromKeywords => "5",
        }
    }
}

/// Resume section a `write` call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum WriteScene {
    #[serde(rename = "JD")]
    JobDescription,
    #[serde(rename = "工作经历")]
    WorkExperience,
    #[serde(rename = "自我评价")]
    SelfEvaluation,
    #[serde(rename = "技能特长")]
    Skills,
    #[serde(rename = "校园实践")]
    CampusPractice,
    #[serde(rename = "岗位画像")]
    JobProfile,
    #[serde(rename = "人才画像")]
    TalentProfile,
}

impl WriteScene {
    pub const ALL: [WriteScene; 7] = [
        WriteScene::JobDescription,
        WriteScene::WorkExperience,
        WriteScene::SelfEvaluation,
        WriteScene::Skills,
        WriteScene::CampusPractice,
        WriteScene::JobProfile,
        WriteScene::TalentProfile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WriteScene::JobDescription => "JD",
            WriteScene::WorkExperience => "工作经历",
            WriteScene::SelfEvaluation => "自我评价",
            WriteScene::Skills => "技能特长",
            WriteScene::CampusPractice => "校园实践",
            WriteScene::JobProfile => "岗位画像",
            WriteScene::TalentProfile => "人才画像",
        }
    }
}

/// Recruiting channel for `write`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Channel {
    #[default]
    #[serde(rename = "社会招聘")]
    Experienced,
    #[serde(rename = "校园招聘")]
    Campus,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Experienced => "社会招聘",
            Channel::Campus => "校园招聘",
        }
    }
}

/// Theme color for `resume_style_write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ResumeColor {
    #[serde(rename = "红色", alias = "red")]
    Red,
    #[serde(rename = "橙色", alias = "orange")]
    Orange,
    #[serde(rename = "黄色", alias = "yellow")]
    Yellow,
    #[serde(rename = "绿色", alias = "green")]
    Green,
    #[serde(rename = "青色", alias = "cyan")]
    Cyan,
    #[serde(rename = "蓝色", alias = "blue")]
    Blue,
    #[serde(rename = "紫色", alias = "purple")]
    Purple,
    #[serde(rename = "粉色", alias = "pink")]
    Pink,
    #[serde(rename = "黑色", alias = "black")]
    Black,
    #[serde(rename = "白色", alias = "white")]
    White,
    #[serde(rename = "灰色", alias = "gray")]
    Gray,
}

impl ResumeColor {
    pub const ALL: [ResumeColor; 11] = [
        ResumeColor::Red,
        ResumeColor::Orange,
        ResumeColor::Yellow,
        ResumeColor::Green,
        ResumeColor::Cyan,
        ResumeColor::Blue,
        ResumeColor::Purple,
        ResumeColor::Pink,
        ResumeColor::Black,
        ResumeColor::White,
        ResumeColor::Gray,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResumeColor::Red => "红色",
            ResumeColor::Orange => "橙色",
            ResumeColor::Yellow => "黄色",
            ResumeColor::Green => "绿色",
            ResumeColor::Cyan => "青色",
            ResumeColor::Blue => "蓝色",
            ResumeColor::Purple => "紫色",
            ResumeColor::Pink => "粉色",
            ResumeColor::Black => "黑色",
            ResumeColor::White => "白色",
            ResumeColor::Gray => "灰色",
        }
    }
}

impl fmt::Display for ResumeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-tool arguments
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BuildResumeParams {
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mobile: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub major: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_year: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: String,
}

impl BuildResumeParams {
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("text", self.text.clone()),
            ("name", self.name.clone()),
            ("mobile", self.mobile.clone()),
            ("job", self.job.clone()),
            ("school", self.school.clone()),
            ("major", self.major.clone()),
            ("work_year", self.work_year.clone()),
            ("company", self.company.clone()),
            ("gender", self.gender.clone()),
            ("age", self.age.clone()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchParams {
    pub job_title: String,
    pub job_desc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resume_url: String,
}

impl MatchParams {
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("job_title", self.job_title.clone()),
            ("job_desc", self.job_desc.clone()),
            ("resume_url", self.resume_url.clone()),
        ]
    }
}

/// `request_id` is the analysis identifier returned by `match`.
#[derive(Debug, Clone, Deserialize)]
pub struct InfoParams {
    #[serde(alias = "requestId")]
    pub request_id: String,
}

impl InfoParams {
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![("requestId", self.request_id.clone())]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WriteParams {
    pub text: String,
    pub task: WriteTask,
    pub scene: WriteScene,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub channels: Channel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
}

impl WriteParams {
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("text", self.text.clone()),
            ("task", self.task.code().to_string()),
            ("scene", self.scene.as_str().to_string()),
            ("job", self.job.clone()),
            ("industry", self.industry.clone()),
            ("channels", self.channels.as_str().to_string()),
            ("company", self.company.clone()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognizeParams {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyseParams {
    /// Output of `recognize`, as text or as the structure itself.
    #[serde(deserialize_with = "text_or_json")]
    pub recognize_data: String,
    pub jd: String,
}

impl AnalyseParams {
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("recognize_data", self.recognize_data.clone()),
            ("jd", self.jd.clone()),
        ]
    }
}

fn text_or_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        other => encode_form_json(&other).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleParams {
    pub color: ResumeColor,
    /// Resume structure, usually the `tagInfo` returned by `recognize`.
    #[serde(deserialize_with = "object_or_json_text")]
    pub modules: Map<String, Value>,
}

impl StyleParams {
    pub fn to_form(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        Ok(vec![
            ("color", self.color.as_str().to_string()),
            ("modules", encode_form_json(&self.modules)?),
        ])
    }
}

fn object_or_json_text<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(D::Error::custom("modules must be a JSON object")),
        },
        _ => Err(D::Error::custom("modules must be a JSON object")),
    }
}
