use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter, Mentionable};

use crate::db::TrackedUser;
use crate::leaderboard::LeaderboardEntry;
use crate::sync::{PromotionEvent, RankStanding};

const GOLD: u32 = 0xf1c40f;
const GREEN: u32 = 0x00ff00;
const ORANGE: u32 = 0xff6600;
const BLUE: u32 = 0x0099ff;

const RANKING_HINT: &str =
    "Use `/register` to join the ranking!\nThe ranking refreshes automatically every day.";

pub fn leaderboard_embed(entries: &[LeaderboardEntry]) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("🏆 Solo/Duo Ranking 🏆")
        .color(GOLD)
        .footer(CreateEmbedFooter::new(RANKING_HINT));

    if entries.is_empty() {
        return embed.description("Nobody has a solo queue rank yet.");
    }

    let mut description = String::new();
    for entry in entries {
        description.push_str(&format!(
            "{}. {} ({})\n**{} {} / {}LP**\n",
            entry.position,
            entry.display_name,
            entry.riot_id,
            entry.rank.tier,
            entry.rank.division,
            entry.rank.points
        ));
    }

    embed.description(description)
}

pub fn promotion_message(event: &PromotionEvent) -> String {
    format!(
        "🎉 **Promotion!** 🎉\nCongratulations {} ({})!\n**{} {}** → **{} {}**",
        event.user.mention(),
        event.riot_id,
        event.previous.tier,
        event.previous.division,
        event.current.tier,
        event.current.division
    )
}

pub fn registered_embed(user: &TrackedUser) -> CreateEmbed {
    let rank = user
        .rank()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "Unranked".to_string());

    CreateEmbed::new()
        .title("Riot ID Registered")
        .description(format!(
            "{} is now linked to **{}**",
            user.user_id().mention(),
            user.riot_id()
        ))
        .color(GREEN)
        .field("Solo/Duo", rank, true)
}

pub fn unregistered_embed(user: &TrackedUser) -> CreateEmbed {
    CreateEmbed::new()
        .title("Registration Removed")
        .description(format!("**{}** left the ranking", user.riot_id()))
        .color(ORANGE)
}

pub fn standing_embed(user: &TrackedUser, standing: &RankStanding) -> CreateEmbed {
    let live = match standing {
        RankStanding::Ranked(rank) => rank.to_string(),
        RankStanding::Unranked => "Unranked".to_string(),
        RankStanding::RetriesExhausted => "Unavailable (rate limited), try again later".to_string(),
    };
    let stored = user
        .rank()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "Unranked".to_string());

    CreateEmbed::new()
        .title(user.riot_id())
        .description(user.user_id().mention().to_string())
        .color(BLUE)
        .field("Current", live, true)
        .field("Last synchronized", stored, true)
}
