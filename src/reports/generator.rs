use crate::social::UserId;
use crate::types::SocialReport;
use anyhow::Result;

/// Report generator for creating various output formats
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate report in the specified format
    pub fn generate(&self, report: &SocialReport, format: &str) -> Result<String> {
        match format.to_lowercase().as_str() {
            "json" => self.generate_json(report),
            "markdown" => self.generate_markdown(report),
            "text" => self.generate_text(report),
            _ => Err(anyhow::anyhow!("Unsupported format: {}", format)),
        }
    }

    /// Generate JSON format report
    fn generate_json(&self, report: &SocialReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Generate Markdown format report
    fn generate_markdown(&self, report: &SocialReport) -> Result<String> {
        let rows: Vec<String> = report
            .paths
            .paths
            .iter()
            .map(|(user, path)| format!("| {} | {} | {} |", user, path.len() - 1, join_path(path)))
            .collect();

        Ok(format!(
            r#"# Social Network Report

**Source User**: {}
**Users**: {}
**Friendships**: {} ({} collisions, {} attempts)

## Extended Network
- **Users Reached**: {}
- **Network Coverage**: {:.1}%
- **Average Path Length**: {:.2}
- **Max Degrees of Separation**: {}

## Shortest Paths
| User | Hops | Path |
|------|------|------|
{}

---
*Generated at: {}*
"#,
            report.source,
            report.total_users,
            report.population.friendships,
            report.population.collisions,
            report.population.attempts,
            report.paths.paths.len(),
            report.network_coverage * 100.0,
            report.paths.average_length,
            report.max_degree_of_separation,
            rows.join("\n"),
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
    }

    /// Generate plain text format report
    fn generate_text(&self, report: &SocialReport) -> Result<String> {
        let mut output = format!(
            "Social Network Report\n\
             =====================\n\
             Source user: {}\n\
             Users: {}  Friendships: {}  Collisions: {}\n\
             Reached: {} ({:.1}% coverage)\n\
             Average path length: {:.2}\n\
             Max degrees of separation: {}\n\n",
            report.source,
            report.total_users,
            report.population.friendships,
            report.population.collisions,
            report.paths.paths.len(),
            report.network_coverage * 100.0,
            report.paths.average_length,
            report.max_degree_of_separation,
        );

        for (user, path) in &report.paths.paths {
            output.push_str(&format!("  {:>5}: {}\n", user, join_path(path)));
        }

        Ok(output)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn join_path(path: &[UserId]) -> String {
    path.iter()
        .map(|user| user.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::SocialGraph;
    use chrono::Utc;

    fn create_report() -> SocialReport {
        let mut social = SocialGraph::new();
        for name in ["Ann", "Ben", "Cat"] {
            social.add_user(name);
        }
        social.add_friendship(1, 2).unwrap();
        social.add_friendship(2, 3).unwrap();

        let paths = social.get_all_social_paths(1).unwrap();
        SocialReport {
            source: 1,
            total_users: 3,
            population: crate::social::PopulationStats {
                friendships: 2,
                collisions: 0,
                attempts: 2,
            },
            network_coverage: paths.network_coverage(3),
            max_degree_of_separation: paths.max_degree_of_separation(),
            paths,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_text_report() {
        let output = ReportGenerator::new().generate(&create_report(), "text").unwrap();

        assert!(output.contains("Source user: 1"));
        assert!(output.contains("1 -> 2 -> 3"));
        assert!(output.contains("100.0% coverage"));
    }

    #[test]
    fn test_markdown_report() {
        let output = ReportGenerator::new().generate(&create_report(), "Markdown").unwrap();

        assert!(output.starts_with("# Social Network Report"));
        assert!(output.contains("| 3 | 2 | 1 -> 2 -> 3 |"));
    }

    #[test]
    fn test_json_report() {
        let output = ReportGenerator::new().generate(&create_report(), "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["source"], 1);
        assert_eq!(value["paths"]["paths"]["3"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_unsupported_format() {
        assert!(ReportGenerator::new().generate(&create_report(), "xml").is_err());
    }
}
