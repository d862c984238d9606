//! reflect-cli: operator CLI for the Reflect HTTP API
//!
//! # Subcommands
//! - `status`                  : show server health and generation mode
//! - `stats [--json]`          : dialogue analytics counts
//! - `programs`                : list the program catalog
//! - `assess <ID=TAG>... [--json]`: score a self-assessment, e.g. `1=reflect 2=people ...`

use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8766";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "reflect-cli",
    version,
    about = "Reflect leadership-coaching service operator CLI"
)]
struct Cli {
    /// Reflect HTTP server URL (overrides REFLECT_HTTP_URL env var)
    #[arg(long, env = "REFLECT_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show Reflect server status
    Status,

    /// Show dialogue analytics counts
    Stats {
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// List the coaching programs
    Programs,

    /// Score a self-assessment
    Assess {
        /// Answers as QUESTION=TAG pairs, one per question
        #[arg(required = true, value_parser = parse_answer)]
        answers: Vec<(u8, String)>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_conversations: u64,
    pub completed_conversations: u64,
    pub abandoned_conversations: u64,
    #[serde(default)]
    pub npl_recommendations: u64,
    #[serde(default)]
    pub lir_recommendations: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub title: String,
    pub description: String,
    pub strengths: Vec<String>,
    pub growth: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProgramEntry {
    pub code: String,
    pub title: String,
    pub duration: String,
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct ProgramsResponse {
    pub programs: Vec<ProgramEntry>,
}

// ============================================================================
// Parsing and formatting helpers
// ============================================================================

/// Parse `3=mediate` into `(3, "mediate")`.
pub fn parse_answer(s: &str) -> Result<(u8, String), String> {
    let (id, tag) = s
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION=TAG, got '{}'", s))?;
    let id: u8 = id
        .trim()
        .parse()
        .map_err(|_| format!("question id '{}' is not a number", id))?;
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(format!("missing tag for question {}", id));
    }
    Ok((id, tag.to_lowercase()))
}

/// Completion rate as a whole percentage of started conversations.
pub fn completion_rate(stats: &AnalyticsStats) -> Option<u64> {
    if stats.total_conversations == 0 {
        return None;
    }
    Some(stats.completed_conversations * 100 / stats.total_conversations)
}

pub fn format_stats(stats: &AnalyticsStats) -> String {
    let rate = completion_rate(stats)
        .map(|r| format!("{}%", r))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "Started:    {}\nCompleted:  {} ({})\nAbandoned:  {}\nNPL recs:   {}\nLIR recs:   {}",
        stats.total_conversations,
        stats.completed_conversations,
        rate,
        stats.abandoned_conversations,
        stats.npl_recommendations,
        stats.lir_recommendations
    )
}

pub fn format_profile(profile: &ProfileResponse) -> String {
    let mut out = format!("{}\n\n{}\n\nStrengths:\n", profile.title, profile.description);
    for s in &profile.strengths {
        out.push_str(&format!("  • {}\n", s));
    }
    out.push_str("\nGrowth:\n");
    for g in &profile.growth {
        out.push_str(&format!("  • {}\n", g));
    }
    out
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client(timeout_secs: u64) -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?)
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", server);
    let resp = client(10)?.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Reflect server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:        {}", body["version"].as_str().unwrap_or("?"));
            println!("Generation:     {}", body["generation"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            let status = r.status();
            eprintln!("reflect-cli: server unhealthy (HTTP {})", status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("reflect-cli: cannot reach {}: {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn do_stats(server: &str, json_output: bool) -> anyhow::Result<()> {
    let url = format!("{}/analytics", server);
    let resp = client(10)?.get(&url).send()?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("reflect-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }

    let body: serde_json::Value = resp.json()?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let stats: AnalyticsStats = serde_json::from_value(body)?;
        println!("{}", format_stats(&stats));
    }
    Ok(())
}

fn do_programs(server: &str) -> anyhow::Result<()> {
    let url = format!("{}/programs", server);
    let resp: ProgramsResponse = client(10)?.get(&url).send()?.error_for_status()?.json()?;
    for p in resp.programs {
        println!("{:<4} {:<26} {:<9} {}", p.code, p.title, p.duration, p.format);
    }
    Ok(())
}

fn do_assess(server: &str, answers: Vec<(u8, String)>, json_output: bool) -> anyhow::Result<()> {
    let answers: BTreeMap<u8, String> = answers.into_iter().collect();
    let url = format!("{}/assessment", server);
    let resp = client(10)?
        .post(&url)
        .json(&serde_json::json!({ "answers": answers }))
        .send()?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body: serde_json::Value = resp.json().unwrap_or_default();
        eprintln!(
            "reflect-cli: assessment rejected ({}): {}",
            status,
            body["error"].as_str().unwrap_or("unknown error")
        );
        std::process::exit(1);
    }

    let body: serde_json::Value = resp.json()?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let profile: ProfileResponse = serde_json::from_value(body)?;
        print!("{}", format_profile(&profile));
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Status => do_status(&server),
        Commands::Stats { json } => do_stats(&server, json),
        Commands::Programs => do_programs(&server),
        Commands::Assess { answers, json } => do_assess(&server, answers, json),
    };

    if let Err(e) = result {
        eprintln!("reflect-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: u64, completed: u64) -> AnalyticsStats {
        AnalyticsStats {
            total_conversations: total,
            completed_conversations: completed,
            abandoned_conversations: 0,
            npl_recommendations: 0,
            lir_recommendations: 0,
        }
    }

    #[test]
    fn test_parse_answer_ok() {
        assert_eq!(parse_answer("3=mediate").unwrap(), (3, "mediate".to_string()));
        assert_eq!(parse_answer(" 1 = Reflect ").unwrap(), (1, "reflect".to_string()));
    }

    #[test]
    fn test_parse_answer_errors() {
        assert!(parse_answer("mediate").is_err());
        assert!(parse_answer("x=mediate").is_err());
        assert!(parse_answer("2=").is_err());
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(&stats(0, 0)), None);
        assert_eq!(completion_rate(&stats(4, 1)), Some(25));
        assert_eq!(completion_rate(&stats(3, 3)), Some(100));
    }

    #[test]
    fn test_stats_parses_summary_without_program_counts() {
        let body = serde_json::json!({
            "totalConversations": 2,
            "completedConversations": 1,
            "abandonedConversations": 1
        });
        let s: AnalyticsStats = serde_json::from_value(body).unwrap();
        assert_eq!(s.total_conversations, 2);
        assert_eq!(s.npl_recommendations, 0);
        let text = format_stats(&s);
        assert!(text.contains("Completed:  1 (50%)"));
    }

    #[test]
    fn test_format_profile_lists_bullets() {
        let profile = ProfileResponse {
            title: "The Relational Leader".to_string(),
            description: "People first.".to_string(),
            strengths: vec!["Empathy".to_string(), "Mentoring".to_string()],
            growth: vec!["Boundaries".to_string()],
        };
        let out = format_profile(&profile);
        assert!(out.starts_with("The Relational Leader\n\nPeople first."));
        assert!(out.contains("  • Mentoring\n"));
        assert!(out.contains("Growth:\n  • Boundaries\n"));
    }

    #[test]
    fn test_cli_parses_assess_pairs() {
        let cli = Cli::try_parse_from(["reflect-cli", "assess", "1=reflect", "2=people"]).unwrap();
        match cli.command {
            Commands::Assess { answers, json } => {
                assert!(!json);
                assert_eq!(answers, vec![(1, "reflect".to_string()), (2, "people".to_string())]);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.server, DEFAULT_SERVER);
    }
}
