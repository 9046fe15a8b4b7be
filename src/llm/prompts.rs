//! Prompt templates for the LLM adapter
//!
//! Human templates use `{base_url}`, `{html_content}`, `{job_url_examples}` and
//! `{job_url}` placeholders, filled by [`render`].

use crate::llm::Prompt;

pub const JOB_SEARCH_SYSTEM_PROMPT: &str = r#"You are an expert in website analysis, specializing in extracting job information from HTML pages.
I will provide you with:

A base URL, used to construct full job URLs.
An HTML snippet containing job-related information.
A few example job URLs showing the expected URL format.

Your task:

Extract all job listings from the provided HTML content.
Return the result as a JSON object in the following format:
{
  "jobs": [
    {
      "job_name": "Job title",
      "job_url": "Job URL"
    }
  ]
}

If a URL is relative, use the base URL to create the full URL.
Only return URLs that follow the same format as the examples.
If any information is missing or formatted inconsistently, normalize the data where possible.
Ensure the output is clean, structured, and free of duplicates."#;

pub const JOB_SEARCH_HUMAN_PROMPT: &str = r#"Can you extract the list of job postings from the following information?

Base URL: {base_url}
Example job URLs: {job_url_examples}
HTML content:
{html_content}

Please return the result as JSON in the specified format."#;

pub const JOB_DETAIL_SYSTEM_PROMPT: &str = r#"You are an expert in website analysis, specializing in extracting job information from HTML pages.
I will provide you with the URL of a single job posting and the HTML of that page.

Your task:

Extract the job title, company, location, contract type, remote status, posting date, description,
candidate profile, required skills, salary or daily rate, and the company presentation.
Use null for any optional field the page does not state. Do not invent values.
Keep descriptions as plain text without HTML tags."#;

pub const JOB_DETAIL_HUMAN_PROMPT: &str = r#"Can you extract the details of the job posting below?

Job URL: {job_url}
HTML content:
{html_content}

Please return the result as JSON in the specified format."#;

/// Substitute `{name}` placeholders in `template`
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (name, value)| acc.replace(&format!("{{{}}}", name), value))
}

/// Prompt asking for the job references on a search-results page
pub fn job_search(base_url: &str, html_content: &str, examples: &[String]) -> Prompt {
    let examples = examples.join("; ");
    Prompt::new(
        JOB_SEARCH_SYSTEM_PROMPT,
        render(JOB_SEARCH_HUMAN_PROMPT, &[
            ("base_url", base_url),
            ("job_url_examples", &examples),
            ("html_content", html_content),
        ]),
    )
}

/// Prompt asking for the structured fields of a single job page
pub fn job_detail(job_url: &str, html_content: &str) -> Prompt {
    Prompt::new(
        JOB_DETAIL_SYSTEM_PROMPT,
        render(JOB_DETAIL_HUMAN_PROMPT, &[("job_url", job_url), ("html_content", html_content)]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(render("{a}-{b}-{a}", &[("a", "1"), ("b", "2")]), "1-2-1");
        assert_eq!(render("{missing}", &[]), "{missing}");
    }

    #[test]
    fn test_job_search_prompt() {
        let examples = vec!["https://x.io/jobs/1".to_string(), "https://x.io/jobs/2".to_string()];
        let prompt = job_search("https://x.io/", "<body>jobs</body>", &examples);

        assert_eq!(prompt.system, JOB_SEARCH_SYSTEM_PROMPT);
        assert!(prompt.human.contains("Base URL: https://x.io/"));
        assert!(prompt.human.contains("Example job URLs: https://x.io/jobs/1; https://x.io/jobs/2"));
        assert!(prompt.human.contains("<body>jobs</body>"));
        assert!(!prompt.human.contains("{base_url}"));
    }

    #[test]
    fn test_job_detail_prompt() {
        let prompt = job_detail("https://x.io/jobs/1", "<body>detail</body>");
        assert!(prompt.human.contains("Job URL: https://x.io/jobs/1"));
        assert!(prompt.human.contains("<body>detail</body>"));
    }
}
