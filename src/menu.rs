//! Reaction-driven interaction sessions: yes/no confirmation prompts and
//! paged message browsing.
//!
//! Both are single-requester.  Only reactions from the user whose message
//! started the session move it; everyone else's are ignored.  One reaction
//! wait is outstanding per session at a time, so state transitions apply in
//! the order the gateway delivers them.

use crate::context::Context;
use anyhow::{ensure, Result};
use serenity::all::{CreateEmbed, CreateMessage, EditMessage, Message, ReactionType};
use std::time::Duration;

/// Renderable message content.  A page or prompt is either plain text or an
/// embed, never both.
#[derive(Clone)]
pub enum Content {
    Text(String),
    Embed(CreateEmbed),
}

impl Content {
    fn to_create_message(&self) -> CreateMessage {
        match self {
            Content::Text(text) => CreateMessage::new().content(text.clone()),
            Content::Embed(embed) => CreateMessage::new().embed(embed.clone()),
        }
    }

    /// Editing must clear whichever form the message showed before.
    fn to_edit_message(&self) -> EditMessage {
        match self {
            Content::Text(text) => EditMessage::new().content(text.clone()).embeds(Vec::new()),
            Content::Embed(embed) => EditMessage::new().content("").embed(embed.clone()),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_owned())
    }
}

impl From<CreateEmbed> for Content {
    fn from(embed: CreateEmbed) -> Self {
        Content::Embed(embed)
    }
}

fn unicode(emoji: &str) -> ReactionType {
    ReactionType::Unicode(emoji.to_owned())
}

fn is_unicode(emoji: &ReactionType, expected: &str) -> bool {
    matches!(emoji, ReactionType::Unicode(name) if name == expected)
}

const CONFIRM_EMOJI: &str = "✔️";
const DENY_EMOJI: &str = "✖️";

/// Options for [`confirm`].
pub struct ConfirmOptions {
    /// Edit the prompt to this after confirmation
    pub confirm_edit: Option<Content>,
    /// Edit the prompt to this after denial or timeout
    pub deny_edit: Option<Content>,
    /// How long to wait for a reaction before resolving to a denial
    pub timeout: Duration,
    /// Keep the reactions on the prompt after resolving
    pub keep_reactions: bool,
    /// Delete the prompt after resolving; takes priority over the edits
    pub delete_after_reaction: bool,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            confirm_edit: None,
            deny_edit: None,
            timeout: Duration::from_secs(300),
            keep_reactions: false,
            delete_after_reaction: false,
        }
    }
}

/// Ask the author of `msg` a yes/no question and suspend until they react,
/// or until the timeout passes.
///
/// Resolves to `false` on an explicit deny and on timeout.  The suspension
/// is the point: destructive operations sit behind this call.
pub async fn confirm(
    ctx: &Context<'_>,
    msg: &Message,
    prompt: impl Into<Content>,
    options: ConfirmOptions,
) -> Result<bool> {
    let mut prompt_msg = msg
        .channel_id
        .send_message(ctx.cache_http, prompt.into().to_create_message())
        .await?;
    prompt_msg
        .react(ctx.cache_http, unicode(CONFIRM_EMOJI))
        .await?;
    prompt_msg.react(ctx.cache_http, unicode(DENY_EMOJI)).await?;

    let reaction = prompt_msg
        .await_reaction(ctx.cache_http)
        .author_id(msg.author.id)
        .timeout(options.timeout)
        .filter(|reaction| {
            is_unicode(&reaction.emoji, CONFIRM_EMOJI) || is_unicode(&reaction.emoji, DENY_EMOJI)
        })
        .await;
    let confirmed = verdict(reaction.as_ref().map(|reaction| &reaction.emoji));

    if options.delete_after_reaction {
        prompt_msg.delete(ctx.cache_http).await?;
        return Ok(confirmed);
    }
    if !options.keep_reactions {
        // Needs the manage-messages permission; not worth failing the
        // session over.
        let _ = prompt_msg.delete_reactions(ctx.cache_http).await;
    }
    let edit = if confirmed {
        options.confirm_edit
    } else {
        options.deny_edit
    };
    if let Some(content) = edit {
        prompt_msg
            .edit(ctx.cache_http, content.to_edit_message())
            .await?;
    }
    Ok(confirmed)
}

/// Timeout and deny resolve identically.
fn verdict(reaction: Option<&ReactionType>) -> bool {
    matches!(reaction, Some(emoji) if is_unicode(emoji, CONFIRM_EMOJI))
}

/// Control emojis for [`pages`].
#[derive(Clone)]
pub struct PageEmojis {
    pub back5: String,
    pub back: String,
    pub stop: String,
    pub next: String,
    pub next5: String,
}

impl Default for PageEmojis {
    fn default() -> Self {
        Self {
            back5: "⏪".to_owned(),
            back: "⬅".to_owned(),
            stop: "⏹".to_owned(),
            next: "➡".to_owned(),
            next5: "⏩".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Back,
    Next,
    Back5,
    Next5,
    Stop,
}

impl PageEmojis {
    fn nav_for(&self, emoji: &ReactionType, jump5: bool) -> Option<Nav> {
        let ReactionType::Unicode(name) = emoji else {
            return None;
        };
        if *name == self.back {
            Some(Nav::Back)
        } else if *name == self.next {
            Some(Nav::Next)
        } else if *name == self.stop {
            Some(Nav::Stop)
        } else if jump5 && *name == self.back5 {
            Some(Nav::Back5)
        } else if jump5 && *name == self.next5 {
            Some(Nav::Next5)
        } else {
            None
        }
    }
}

/// Options for [`pages`].
pub struct PageOptions {
    pub emojis: PageEmojis,
    /// Inactivity window; every navigation input restarts it
    pub timeout: Duration,
    /// Page to start on, clamped into range
    pub start_page: usize,
    /// Remove the requester's reaction after each navigation (needs the
    /// manage-messages permission)
    pub remove_reaction: bool,
    /// With a single page, send it once and skip the session entirely
    pub hide_controls_single_page: bool,
    /// Strip reactions when the session times out and the message is kept
    pub timeout_remove_reactions: bool,
    /// Keep the message when stopped; controls are stripped instead
    pub keep_on_stop: bool,
    /// Offer the jump-5 controls.  `None` adds them whenever there are
    /// more than five pages; they are never added for five or fewer
    pub jump5: Option<bool>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            emojis: PageEmojis::default(),
            timeout: Duration::from_secs(300),
            start_page: 0,
            remove_reaction: true,
            hide_controls_single_page: true,
            timeout_remove_reactions: true,
            keep_on_stop: false,
            jump5: None,
        }
    }
}

/// Browse `pages` in a single message, navigated by the author of `msg`
/// through reactions.  Returns the index of the page showing when the
/// session ended.
pub async fn pages(
    ctx: &Context<'_>,
    msg: &Message,
    pages: Vec<Content>,
    options: PageOptions,
) -> Result<usize> {
    ensure!(!pages.is_empty(), "page sequence is empty");
    let mut index = clamp_start(options.start_page, pages.len());

    if pages.len() == 1 && options.hide_controls_single_page {
        msg.channel_id
            .send_message(ctx.cache_http, pages[0].to_create_message())
            .await?;
        return Ok(0);
    }

    let jump5 = uses_jump_controls(pages.len(), options.jump5);
    let mut view = msg
        .channel_id
        .send_message(ctx.cache_http, pages[index].to_create_message())
        .await?;

    if jump5 {
        view.react(ctx.cache_http, unicode(&options.emojis.back5))
            .await?;
    }
    view.react(ctx.cache_http, unicode(&options.emojis.back))
        .await?;
    view.react(ctx.cache_http, unicode(&options.emojis.stop))
        .await?;
    view.react(ctx.cache_http, unicode(&options.emojis.next))
        .await?;
    if jump5 {
        view.react(ctx.cache_http, unicode(&options.emojis.next5))
            .await?;
    }

    loop {
        let filter_emojis = options.emojis.clone();
        let reaction = view
            .await_reaction(ctx.cache_http)
            .author_id(msg.author.id)
            .timeout(options.timeout)
            .filter(move |reaction| filter_emojis.nav_for(&reaction.emoji, jump5).is_some())
            .await;

        let Some(reaction) = reaction else {
            // Inactivity timeout
            if !options.keep_on_stop {
                view.delete(ctx.cache_http).await?;
            } else if options.timeout_remove_reactions {
                let _ = view.delete_reactions(ctx.cache_http).await;
            }
            return Ok(index);
        };

        // The collector filter only lets control emojis through
        let Some(nav) = options.emojis.nav_for(&reaction.emoji, jump5) else {
            continue;
        };

        if nav == Nav::Stop {
            if options.keep_on_stop {
                let _ = view.delete_reactions(ctx.cache_http).await;
            } else {
                view.delete(ctx.cache_http).await?;
            }
            return Ok(index);
        }

        index = advance(index, pages.len(), nav);
        if options.remove_reaction {
            let _ = reaction.delete(ctx.cache_http).await;
        }
        view.edit(ctx.cache_http, pages[index].to_edit_message())
            .await?;
    }
}

fn clamp_start(start: usize, len: usize) -> usize {
    start.min(len - 1)
}

fn uses_jump_controls(len: usize, jump5: Option<bool>) -> bool {
    len > 5 && jump5.unwrap_or(true)
}

/// Wraparound page arithmetic.  The jumps move by five modulo the page
/// count, computed without negative intermediate values.
fn advance(index: usize, len: usize, nav: Nav) -> usize {
    match nav {
        Nav::Back => {
            if index == 0 {
                len - 1
            } else {
                index - 1
            }
        }
        Nav::Next => (index + 1) % len,
        Nav::Back5 => (index + len - (5 % len)) % len,
        Nav::Next5 => (index + 5) % len,
        Nav::Stop => index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_n_times_wraps_back_to_the_start() {
        let len = 4;
        let mut index = 2;
        for _ in 0..len {
            index = advance(index, len, Nav::Next);
        }
        assert_eq!(index, 2);
    }

    #[test]
    fn back_from_the_first_page_wraps_to_the_last() {
        assert_eq!(advance(0, 7, Nav::Back), 6);
        assert_eq!(advance(0, 2, Nav::Back), 1);
    }

    #[test]
    fn jumps_move_by_five_modulo_the_page_count() {
        let len = 9;
        for index in 0..len {
            assert_eq!(advance(index, len, Nav::Next5), (index + 5) % len);
            assert_eq!(advance(index, len, Nav::Back5), (index + len - 5) % len);
        }
    }

    #[test]
    fn back5_never_underflows() {
        assert_eq!(advance(2, 8, Nav::Back5), 5);
        assert_eq!(advance(0, 6, Nav::Back5), 1);
        assert_eq!(advance(4, 6, Nav::Back5), 5);
    }

    #[test]
    fn jump_controls_only_appear_past_five_pages() {
        assert!(!uses_jump_controls(5, None));
        assert!(uses_jump_controls(6, None));
        assert!(!uses_jump_controls(6, Some(false)));
        assert!(!uses_jump_controls(3, Some(true)));
    }

    #[test]
    fn start_page_is_clamped_into_range() {
        assert_eq!(clamp_start(0, 3), 0);
        assert_eq!(clamp_start(2, 3), 2);
        assert_eq!(clamp_start(10, 3), 2);
    }

    #[test]
    fn confirm_reaction_resolves_true() {
        let yes = unicode(CONFIRM_EMOJI);
        assert!(verdict(Some(&yes)));
    }

    #[test]
    fn deny_and_timeout_both_resolve_false() {
        let no = unicode(DENY_EMOJI);
        assert!(!verdict(Some(&no)));
        assert!(!verdict(None));
    }

    #[test]
    fn control_emojis_map_to_navigation() {
        let emojis = PageEmojis::default();
        assert_eq!(emojis.nav_for(&unicode("⬅"), false), Some(Nav::Back));
        assert_eq!(emojis.nav_for(&unicode("➡"), false), Some(Nav::Next));
        assert_eq!(emojis.nav_for(&unicode("⏹"), false), Some(Nav::Stop));
        assert_eq!(emojis.nav_for(&unicode("⏪"), true), Some(Nav::Back5));
        assert_eq!(emojis.nav_for(&unicode("⏩"), true), Some(Nav::Next5));
        // The jumps are inert when the controls are not offered
        assert_eq!(emojis.nav_for(&unicode("⏪"), false), None);
        assert_eq!(emojis.nav_for(&unicode("⏩"), false), None);
        assert_eq!(emojis.nav_for(&unicode("🦀"), true), None);
    }

    #[test]
    fn custom_control_emojis_are_honored() {
        let emojis = PageEmojis {
            back: "👈".to_owned(),
            next: "👉".to_owned(),
            ..PageEmojis::default()
        };
        assert_eq!(emojis.nav_for(&unicode("👈"), false), Some(Nav::Back));
        assert_eq!(emojis.nav_for(&unicode("⬅"), false), None);
    }

    #[test]
    fn default_timeouts_are_five_minutes() {
        assert_eq!(PageOptions::default().timeout, Duration::from_secs(300));
        assert_eq!(ConfirmOptions::default().timeout, Duration::from_secs(300));
    }

    #[test]
    fn page_option_defaults() {
        let options = PageOptions::default();
        assert_eq!(options.start_page, 0);
        assert!(options.remove_reaction);
        assert!(options.hide_controls_single_page);
        assert!(options.timeout_remove_reactions);
        assert!(!options.keep_on_stop);
        assert!(options.jump5.is_none());
    }
}
