//! Default team colours, keyed by the phonetic word that opens a team name.

pub const DEFAULT_TEAM_COLOR: &str = "#6B7280";

const TEAM_COLORS: [(&str, &str); 6] = [
    ("Alpha", "#DC2626"),
    ("Bravo", "#EAB308"),
    ("Charlie", "#10B981"),
    ("Delta", "#8B5CF6"),
    ("Echo", "#EA580C"),
    ("Foxtrot", "#0891B2"),
];

/// Looks up the colour for the first space-separated word of `team_name`,
/// falling back to gray.
pub fn team_color(team_name: &str) -> &'static str {
    let first = team_name.split(' ').next().unwrap_or_default();
    TEAM_COLORS
        .iter()
        .find(|(word, _)| *word == first)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_TEAM_COLOR)
}
