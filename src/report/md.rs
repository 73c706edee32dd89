use crate::report::Scoreboard;
use crate::scoring::NextAction;
use crate::types::player::Player;
use crate::types::record::{InningsSummary, MatchRecord};

pub fn scoreboard_markdown(board: &Scoreboard) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "# {} v {} (innings {})\n\n",
        board.batting_team, board.bowling_team, board.innings
    ));
    output.push_str(&format!(
        "Score: {}/{} in {} overs (extras {})\n",
        board.runs, board.wickets, board.overs, board.extras
    ));
    if let (Some(target), Some(required)) = (board.target, board.runs_required) {
        output.push_str(&format!("Target: {target}, {required} required\n"));
    }
    output.push('\n');

    output.push_str(&format!(
        "- striker: {}\n- non-striker: {}\n- bowler: {}\n- this over: {}\n- next: {}\n\n",
        board.striker.as_deref().unwrap_or("-"),
        board.non_striker.as_deref().unwrap_or("-"),
        board.bowler.as_deref().unwrap_or("-"),
        if board.this_over.is_empty() {
            "-".to_string()
        } else {
            board
                .this_over
                .iter()
                .map(|record| record.label.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        },
        describe_next(board.next),
    ));

    if !board.eligible_bowlers.is_empty() {
        output.push_str(&format!(
            "Eligible bowlers: {}\n\n",
            board.eligible_bowlers.join(", ")
        ));
    }
    if let Some(joker) = &board.joker {
        output.push_str(&format!(
            "Joker {}: {} ball(s) bowled, can bat: {}, can bowl: {}\n\n",
            joker.name,
            joker.balls_bowled,
            if joker.can_bat { "yes" } else { "no" },
            if joker.can_bowl { "yes" } else { "no" }
        ));
    }

    push_batting(&mut output, &board.batting);
    push_bowling(&mut output, &board.bowling);

    if let Some(first) = &board.first_innings {
        output.push_str(&format!("## First innings\n\n{}\n\n", summary_line(first)));
    }
    if let Some(record) = &board.result {
        output.push_str(&format!("## Result\n\n{}\n", record.headline()));
    }
    output
}

pub fn record_markdown(record: &MatchRecord) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "# {} v {}\n\n",
        record.first_innings.batting_team, record.first_innings.bowling_team
    ));
    output.push_str(&format!(
        "{} ({} overs, played {})\n\n",
        record.format,
        record.total_overs,
        record.played_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!("**{}**\n\n", record.headline()));

    for (label, innings) in [
        ("First innings", &record.first_innings),
        ("Second innings", &record.second_innings),
    ] {
        output.push_str(&format!("## {label}: {}\n\n", summary_line(innings)));
        push_batting(&mut output, &innings.batting);
        push_bowling(&mut output, &innings.bowling);
    }

    output.push_str("## Top performers\n\n");
    match &record.top_batsman {
        Some(top) => output.push_str(&format!(
            "- batting: {} ({}) {} off {}\n",
            top.name, top.team, top.runs, top.balls_faced
        )),
        None => output.push_str("- batting: none\n"),
    }
    match &record.top_bowler {
        Some(top) => output.push_str(&format!(
            "- bowling: {} ({}) {}/{}, economy {:.2}\n",
            top.name, top.team, top.wickets, top.runs_conceded, top.economy
        )),
        None => output.push_str("- bowling: none\n"),
    }
    output
}

pub fn history_markdown(records: &[MatchRecord]) -> String {
    let mut output = String::from("# Match history\n\n");
    if records.is_empty() {
        output.push_str("- none\n");
        return output;
    }
    for record in records {
        output.push_str(&format!(
            "- {} | {} v {} | {} v {} | {}\n",
            record.played_at.format("%Y-%m-%d"),
            record.first_innings.batting_team,
            record.first_innings.bowling_team,
            score(&record.first_innings),
            score(&record.second_innings),
            record.headline()
        ));
    }
    output
}

fn push_batting(output: &mut String, batting: &[Player]) {
    output.push_str("| Batter | R | B | 4s | 6s | SR |\n|---|---|---|---|---|---|\n");
    for player in batting {
        output.push_str(&format!(
            "| {}{} | {} | {} | {} | {} | {:.1} |\n",
            player.name,
            if player.batting.is_out { "" } else { "*" },
            player.batting.runs,
            player.batting.balls_faced,
            player.batting.fours,
            player.batting.sixes,
            player.strike_rate()
        ));
    }
    output.push('\n');
}

fn push_bowling(output: &mut String, bowling: &[Player]) {
    output.push_str("| Bowler | O | R | W | Econ |\n|---|---|---|---|---|\n");
    for player in bowling {
        output.push_str(&format!(
            "| {} | {:.1} | {} | {} | {:.2} |\n",
            player.name,
            player.overs_bowled(),
            player.bowling.runs_conceded,
            player.bowling.wickets,
            player.economy()
        ));
    }
    output.push('\n');
}

fn summary_line(innings: &InningsSummary) -> String {
    format!(
        "{} {} ({} overs, extras {})",
        innings.batting_team,
        score(innings),
        innings.overs,
        innings.extras
    )
}

fn score(innings: &InningsSummary) -> String {
    format!("{}/{}", innings.runs, innings.wickets)
}

fn describe_next(next: NextAction) -> String {
    match next {
        NextAction::Continue => "bowl".to_string(),
        NextAction::SelectBatter(end) => format!("select {} batter", end.as_str()),
        NextAction::SelectBowler => "select bowler".to_string(),
        NextAction::InningsComplete => "innings complete".to_string(),
        NextAction::MatchComplete => "match complete".to_string(),
    }
}
