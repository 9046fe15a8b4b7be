//! Normalized job records
//!
//! [`JobSummary`] and [`JobDetail`] are what the adapters hand back to callers.
//! [`JobSearchResult`] and [`JobDetailRecord`] are the shapes the model is
//! constrained to emit; their doc comments become field descriptions in the JSON
//! schema sent to the provider.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One job card from a search-results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub title: String,
    pub company: String,
    pub location: String,
    pub contract_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_time: Option<String>,
    /// Absolute URL of the job page
    pub url: String,
    /// Identifier of the adapter that produced the record
    pub source: String,
}

/// Full description of a single job page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    pub title: String,
    pub company: String,
    pub company_description: String,
    pub location: String,
    pub contract_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub description: String,
    pub requirements: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<NaiveDate>,
    pub url: String,
    pub source: String,
}

/// A job summary merged with its detail page, when one could be extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub summary: JobSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<JobDetail>,
}

/// A job reference extracted by the model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct JobRef {
    /// Name of the job
    pub job_name: String,
    /// URL of the job
    pub job_url: String,
}

/// Model output for a search-results page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobSearchResult {
    /// List of jobs
    #[serde(default)]
    pub jobs: Vec<JobRef>,
}

/// Model output for a single job page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobDetailRecord {
    /// Name of the job
    pub job_name: String,
    /// Company of the job
    pub job_company: String,
    /// Location of the job
    pub job_location: String,
    /// Contract type of the job
    pub job_contract_type: String,
    /// Remote status of the job
    #[serde(default)]
    pub job_remote_status: Option<String>,
    /// Posted time of the job
    #[serde(default)]
    pub job_posted_time: Option<String>,
    /// Description of the job
    #[serde(default)]
    pub job_description: Option<String>,
    /// Profile sought for the job
    #[serde(default)]
    pub job_profil_content: Option<String>,
    /// Required skills of the job
    #[serde(default)]
    pub job_required_skills: Option<String>,
    /// Salary or daily rate of the job
    #[serde(default)]
    pub job_salary: Option<String>,
    /// Company presentation, when the page has one
    #[serde(default)]
    pub job_company_description: Option<String>,
    /// URL of the job
    pub job_url: String,
}

impl JobDetailRecord {
    /// Convert into a [`JobDetail`], preferring `page_url` over whatever URL the model echoed
    pub fn into_detail(self, page_url: &str, source: &str) -> JobDetail {
        let requirements = [self.job_profil_content, self.job_required_skills]
            .into_iter()
            .flatten()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        JobDetail {
            title: self.job_name,
            company: self.job_company,
            company_description: self.job_company_description.unwrap_or_default(),
            location: self.job_location,
            contract_type: self.job_contract_type,
            salary: self.job_salary.filter(|s| !s.trim().is_empty()),
            description: self.job_description.unwrap_or_default(),
            requirements,
            published_at: self.job_posted_time.as_deref().and_then(parse_posted_date),
            url: page_url.to_string(),
            source: source.to_string(),
        }
    }
}

/// Parse the date formats job boards commonly print (ISO 8601 or `dd/mm/yyyy`)
pub fn parse_posted_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_deserialization() {
        let json = r#"{"jobs": [{"job_name": "Data Engineer", "job_url": "https://example.com/jobs/1"}]}"#;
        let result: JobSearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.jobs.len(), 1);
        assert_eq!(result.jobs[0].job_name, "Data Engineer");
    }

    #[test]
    fn test_search_result_missing_jobs_defaults_empty() {
        let result: JobSearchResult = serde_json::from_str("{}").unwrap();
        assert!(result.jobs.is_empty());
    }

    #[test]
    fn test_detail_record_into_detail() {
        let record = JobDetailRecord {
            job_name: "Rust Engineer".to_string(),
            job_company: "Acme".to_string(),
            job_location: "Paris".to_string(),
            job_contract_type: "CDI".to_string(),
            job_posted_time: Some("2025-03-02T10:00:00Z".to_string()),
            job_description: Some("Build things".to_string()),
            job_profil_content: Some("5 years".to_string()),
            job_required_skills: Some("Rust, SQL".to_string()),
            job_salary: Some(" ".to_string()),
            job_url: "https://elsewhere.example/1".to_string(),
            ..Default::default()
        };

        let detail = record.into_detail("https://example.com/jobs/1", "llm");
        assert_eq!(detail.title, "Rust Engineer");
        assert_eq!(detail.requirements, "5 years\n\nRust, SQL");
        assert_eq!(detail.salary, None);
        assert_eq!(detail.published_at, NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(detail.url, "https://example.com/jobs/1");
        assert_eq!(detail.source, "llm");
    }

    #[test]
    fn test_parse_posted_date() {
        assert_eq!(parse_posted_date("02/03/2025"), NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(parse_posted_date("2025-03-02"), NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(parse_posted_date("il y a 3 jours"), None);
    }

    #[test]
    fn test_summary_serialization_skips_empty_options() {
        let summary = JobSummary {
            title: "t".to_string(),
            company: "c".to_string(),
            location: "l".to_string(),
            contract_type: "CDI".to_string(),
            remote_status: None,
            posted_time: None,
            url: "https://example.com/j".to_string(),
            source: "test".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("remote_status").is_none());
        assert_eq!(json["source"], "test");
    }
}
