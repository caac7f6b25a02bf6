//! Tabular import/export for the teams and games tables.
//!
//! Column lookup is header-driven and case-insensitive, so column order does
//! not matter. Missing or malformed fields default rather than aborting the
//! import; only unreadable CSV framing surfaces as an error.

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::debug;

use crate::constants::{clamp_prob, coerce, DEFAULT_PROB_HOME};
use crate::game::{Game, GameId, Outcome};
use crate::team::{Team, TeamId};

/// Fallback display name for imported teams without one.
pub const UNNAMED_TEAM: &str = "Unnamed team";

const TEAMS_HEADER: [&str; 7] = ["name", "gp", "pts", "rw", "row", "gf", "ga"];
const GAMES_HEADER: [&str; 4] = ["home", "away", "outcome", "probHome"];

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),

    #[error("failed to write CSV: {0}")]
    Write(String),
}

/// Result of a games import: the parsed fixtures plus any teams that had to
/// be created because a fixture referenced an unknown name.
#[derive(Debug, Clone)]
pub struct GamesImport {
    pub games: Vec<Game>,
    pub created_teams: Vec<Team>,
}

fn reader(data: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data.as_bytes())
}

/// Map lowercased header names to column indices.
fn header_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect()
}

fn field<'r>(record: &'r StringRecord, columns: &HashMap<String, usize>, name: &str) -> &'r str {
    columns
        .get(name)
        .and_then(|&i| record.get(i))
        .unwrap_or("")
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

/// Parse a counter field. Malformed, non-finite or negative input collapses
/// to 0; fractional input truncates.
fn parse_counter(text: &str) -> u32 {
    let value = text.parse::<f64>().map(coerce).unwrap_or(0.0);
    if value > 0.0 {
        value as u32
    } else {
        0
    }
}

/// Parse a probability field: unparsable (or zero, which the form surface
/// uses as "unset") falls back to the default, then the clamp applies.
fn parse_prob(text: &str) -> f64 {
    let value = coerce(text.parse::<f64>().unwrap_or(0.0));
    let value = if value == 0.0 { DEFAULT_PROB_HOME } else { value };
    clamp_prob(value)
}

/// Import a teams table (`name,gp,pts,rw,row,gf,ga`). Each row becomes a
/// team with a fresh id; blank rows are skipped.
pub fn import_teams(data: &str) -> Result<Vec<Team>, CsvError> {
    let mut rdr = reader(data);
    let columns = header_index(rdr.headers()?);

    let mut teams = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let name = field(&record, &columns, "name");
        let mut team = Team::new(if name.is_empty() { UNNAMED_TEAM } else { name });
        team.gp = parse_counter(field(&record, &columns, "gp"));
        team.pts = parse_counter(field(&record, &columns, "pts"));
        team.rw = parse_counter(field(&record, &columns, "rw"));
        team.row = parse_counter(field(&record, &columns, "row"));
        team.gf = parse_counter(field(&record, &columns, "gf"));
        team.ga = parse_counter(field(&record, &columns, "ga"));
        teams.push(team);
    }
    debug!(teams = teams.len(), "imported teams table");
    Ok(teams)
}

/// Import a games table (`home,away,outcome,probHome`).
///
/// Home and away are team names, resolved case-insensitively against
/// `roster`; unknown names get a fresh zero-counter team. A blank name maps
/// to an id that resolves to nothing, so the game becomes a standings no-op
/// rather than an error.
pub fn import_games(data: &str, roster: &[Team]) -> Result<GamesImport, CsvError> {
    let mut rdr = reader(data);
    let columns = header_index(rdr.headers()?);

    let mut by_name: HashMap<String, TeamId> = roster
        .iter()
        .map(|team| (team.name.trim().to_lowercase(), team.id.clone()))
        .collect();
    let mut created_teams = Vec::new();

    let mut resolve = |name: &str| -> TeamId {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return TeamId::new("");
        }
        if let Some(id) = by_name.get(&key) {
            return id.clone();
        }
        let team = Team::new(name);
        let id = team.id.clone();
        by_name.insert(key, id.clone());
        created_teams.push(team);
        id
    };

    let mut games = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        games.push(Game {
            id: GameId::random(),
            home_id: resolve(field(&record, &columns, "home")),
            away_id: resolve(field(&record, &columns, "away")),
            outcome: Outcome::parse_or_tbd(field(&record, &columns, "outcome")),
            prob_home: parse_prob(field(&record, &columns, "probhome")),
        });
    }
    debug!(
        games = games.len(),
        created = created_teams.len(),
        "imported games table"
    );
    Ok(GamesImport {
        games,
        created_teams,
    })
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, CsvError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| CsvError::Write(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Export the teams table.
pub fn export_teams(teams: &[Team]) -> Result<String, CsvError> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(TEAMS_HEADER)?;
    for team in teams {
        wtr.write_record([
            team.name.clone(),
            team.gp.to_string(),
            team.pts.to_string(),
            team.rw.to_string(),
            team.row.to_string(),
            team.gf.to_string(),
            team.ga.to_string(),
        ])?;
    }
    finish(wtr)
}

/// Export the games table. Team ids are rendered as names; a game whose id
/// no longer resolves gets a blank name cell.
pub fn export_games(games: &[Game], roster: &[Team]) -> Result<String, CsvError> {
    let names: HashMap<&TeamId, &str> = roster
        .iter()
        .map(|team| (&team.id, team.name.as_str()))
        .collect();

    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(GAMES_HEADER)?;
    for game in games {
        wtr.write_record([
            names.get(&game.home_id).copied().unwrap_or("").to_string(),
            names.get(&game.away_id).copied().unwrap_or("").to_string(),
            game.outcome.as_str().to_string(),
            game.prob_home.to_string(),
        ])?;
    }
    finish(wtr)
}

/// Sample teams document in the import format.
pub fn teams_template() -> String {
    ["name,gp,pts,rw,row,gf,ga",
     "Vaxjo Lakers,38,75,16,22,112,89",
     "Frolunda,38,70,15,20,104,92",
     "Skelleftea,38,68,14,19,109,95",
     ""]
    .join("\n")
}

/// Sample games document in the import format.
pub fn games_template() -> String {
    ["home,away,outcome,probHome",
     "Vaxjo Lakers,Frolunda,TBD,0.58",
     "Skelleftea,Vaxjo Lakers,HOME_REG_WIN,0.6",
     "Frolunda,Skelleftea,AWAY_OT_WIN,0.48",
     ""]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_teams_basic() {
        let data = "name,gp,pts,rw,row,gf,ga\nFrolunda,38,70,15,20,104,92\n";
        let teams = import_teams(data).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Frolunda");
        assert_eq!(teams[0].gp, 38);
        assert_eq!(teams[0].pts, 70);
        assert_eq!(teams[0].ga, 92);
    }

    #[test]
    fn test_import_teams_column_order_and_case() {
        let data = "PTS,NAME,ga\n70,Frolunda,92\n";
        let teams = import_teams(data).unwrap();
        assert_eq!(teams[0].name, "Frolunda");
        assert_eq!(teams[0].pts, 70);
        assert_eq!(teams[0].ga, 92);
        // Columns absent from the header default to zero.
        assert_eq!(teams[0].gp, 0);
    }

    #[test]
    fn test_import_teams_malformed_counters_collapse_to_zero() {
        let data = "name,gp,pts\nLulea,abc,-5\n";
        let teams = import_teams(data).unwrap();
        assert_eq!(teams[0].gp, 0);
        assert_eq!(teams[0].pts, 0);
    }

    #[test]
    fn test_import_teams_blank_name_and_rows() {
        let data = "name,gp\n,3\n,,\n\nLulea,2\n";
        let teams = import_teams(data).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, UNNAMED_TEAM);
        assert_eq!(teams[0].gp, 3);
        assert_eq!(teams[1].name, "Lulea");
    }

    #[test]
    fn test_import_teams_quoted_fields() {
        let data = "name,gp\n\"Lakers, The \"\"Royal\"\" Club\",12\n";
        let teams = import_teams(data).unwrap();
        assert_eq!(teams[0].name, "Lakers, The \"Royal\" Club");
        assert_eq!(teams[0].gp, 12);
    }

    #[test]
    fn test_import_games_resolves_and_creates() {
        let roster = vec![Team::new("Frolunda")];
        let data = "home,away,outcome,probHome\nfrolunda,Lulea,TBD,0.58\n";
        let imported = import_games(data, &roster).unwrap();

        assert_eq!(imported.games.len(), 1);
        assert_eq!(imported.created_teams.len(), 1);
        assert_eq!(imported.created_teams[0].name, "Lulea");
        // Existing team matched case-insensitively, no duplicate created.
        assert_eq!(imported.games[0].home_id, roster[0].id);
        assert_eq!(imported.games[0].away_id, imported.created_teams[0].id);
        assert!((imported.games[0].prob_home - 0.58).abs() < 1e-12);
    }

    #[test]
    fn test_import_games_defaults() {
        let data = "home,away,outcome,probHome\nA,B,NONSENSE,\nA,B,,abc\n";
        let imported = import_games(data, &[]).unwrap();
        assert_eq!(imported.games[0].outcome, Outcome::Tbd);
        assert!((imported.games[0].prob_home - 0.5).abs() < 1e-12);
        assert!((imported.games[1].prob_home - 0.5).abs() < 1e-12);
        // A and B created once despite appearing twice.
        assert_eq!(imported.created_teams.len(), 2);
    }

    #[test]
    fn test_import_games_prob_clamped() {
        let data = "home,away,outcome,probHome\nA,B,TBD,2\nB,A,TBD,-1\n";
        let imported = import_games(data, &[]).unwrap();
        assert!((imported.games[0].prob_home - 0.95).abs() < 1e-12);
        assert!((imported.games[1].prob_home - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_import_games_short_outcome_tags() {
        let data = "home,away,outcome,probHome\nA,B,H_REG,0.6\nA,B,AWAY_OT_WIN,0.4\n";
        let imported = import_games(data, &[]).unwrap();
        assert_eq!(imported.games[0].outcome, Outcome::HomeRegWin);
        assert_eq!(imported.games[1].outcome, Outcome::AwayOtWin);
    }

    #[test]
    fn test_export_teams_quotes_when_needed() {
        let mut team = Team::new("Lakers, The Club");
        team.gp = 5;
        let out = export_teams(&[team]).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("name,gp,pts,rw,row,gf,ga"));
        assert_eq!(lines.next(), Some("\"Lakers, The Club\",5,0,0,0,0,0"));
    }

    #[test]
    fn test_export_games_renders_names() {
        let home = Team::new("Frolunda");
        let away = Team::new("Lulea");
        let game = Game::new(home.id.clone(), away.id.clone())
            .with_outcome(Outcome::HomeOtWin)
            .with_prob_home(0.58);
        let orphan = Game::new(TeamId::new("gone"), away.id.clone());

        let out = export_games(&[game, orphan], &[home, away]).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("home,away,outcome,probHome"));
        assert_eq!(lines.next(), Some("Frolunda,Lulea,HOME_OT_WIN,0.58"));
        assert_eq!(lines.next(), Some(",Lulea,TBD,0.5"));
    }

    #[test]
    fn test_teams_round_trip() {
        let mut team = Team::new("Vaxjo \"Lakers\"");
        team.pts = 75;
        team.gf = 112;
        let exported = export_teams(&[team.clone()]).unwrap();
        let imported = import_teams(&exported).unwrap();
        assert_eq!(imported[0].name, team.name);
        assert_eq!(imported[0].pts, 75);
        assert_eq!(imported[0].gf, 112);
    }

    #[test]
    fn test_templates_parse() {
        let teams = import_teams(&teams_template()).unwrap();
        assert_eq!(teams.len(), 3);
        assert_eq!(teams[0].name, "Vaxjo Lakers");
        assert_eq!(teams[0].pts, 75);

        let imported = import_games(&games_template(), &teams).unwrap();
        assert_eq!(imported.games.len(), 3);
        assert!(imported.created_teams.is_empty());
        assert_eq!(imported.games[1].outcome, Outcome::HomeRegWin);
    }
}
