use std::error::Error;

use log::{info, warn};
use socialgram::{
    api::{Backend, HttpBackend},
    config::{Command, Config, FeedKind},
    model::{MediaUpload, Post},
    reconciler::{Outcome, Reconciler},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();
    info!("# Socialgram #");
    info!("");

    let app = Reconciler::new(HttpBackend::new(&config)?);
    info!("Loading feeds from {}", config.api());
    app.refresh().await;

    match config.command {
        Command::Feed { kind } => {
            let posts = app.read(|state| match kind {
                FeedKind::Home => state.home.clone(),
                FeedKind::Explore => state.explore.clone(),
            });
            info!("{} feed, {} posts", kind, posts.len());
            display_posts(&posts);
        }
        Command::Profile { username } => {
            if app.open_profile(&username).await.is_success() {
                let (user, posts) =
                    app.read(|state| (state.profile_user.clone(), state.profile.clone()));
                if let Some(user) = user {
                    info!(
                        "{} ({} followers, following: {})",
                        user.username,
                        user.followers(),
                        user.is_following()
                    );
                    if let Some(bio) = &user.bio {
                        info!("  {}", bio);
                    }
                }
                display_posts(&posts);
            }
        }
        Command::Like { post } => {
            let outcome = app.toggle_like(&post).await;
            if let Some(post) = app.read(|state| state.find_post(&post).cloned()) {
                info!("{}: {} likes, liked: {}", post.id, post.likes, post.is_liked);
            }
            report(outcome);
        }
        Command::LikeReel { reel } => {
            let outcome = app.toggle_reel_like(&reel).await;
            if let Some(reel) = app.read(|state| state.find_reel(&reel).cloned()) {
                info!("{}: {} likes, liked: {}", reel.id, reel.likes, reel.is_liked);
            }
            report(outcome);
        }
        Command::Comment { post, text } => {
            report(app.add_comment(&post, &text).await);
        }
        Command::Follow { username } => {
            match app.relationship(&username).await {
                Some(was_following) => report(app.toggle_follow(&username, was_following).await),
                None => warn!("Could not load {}", username),
            }
        }
        Command::Repost { post, comment } => {
            report(app.repost(&post, &comment).await);
        }
        Command::Post {
            file,
            caption,
            suggest_caption,
        } => {
            let media = MediaUpload::from_path(&file).await?;
            let caption = match caption {
                Some(caption) => caption,
                None if suggest_caption => {
                    let caption = app.generate_caption(&media).await;
                    info!("Suggested caption: {}", caption);
                    caption
                }
                None => String::new(),
            };
            report(app.create_post(&media, &caption).await);
        }
        Command::Story { file } => {
            let media = MediaUpload::from_path(&file).await?;
            report(app.create_story(&media).await);
        }
        Command::Stories => play_stories(&app).await,
        Command::Notifications => {
            let notifications = app.read(|state| state.notifications.clone());
            for notification in &notifications {
                let marker = if notification.is_read { " " } else { "*" };
                info!(
                    "{} {} ({})",
                    marker,
                    notification.summary(),
                    notification.timestamp.format("%Y-%m-%d %H:%M")
                );
            }
            info!("{} marked read", app.mark_notifications_read());
        }
        Command::Send { username, text } => {
            if app.send_message(&username, &text).await.is_success() {
                app.replies_delivered().await;
                let conversation = app.read(|state| {
                    state
                        .conversations
                        .iter()
                        .find(|c| c.has_participant(&username))
                        .cloned()
                });
                for message in conversation.iter().flat_map(|c| &c.messages) {
                    info!("{}: {}", message.sender.username, message.text);
                }
            }
        }
        Command::Chat { text } => {
            if let Some(reply) = app.ask_chatbot(&text).await {
                info!("{}", reply);
            }
        }
    }

    for notice in app.notices().history() {
        warn!("{}", notice.message);
    }

    info!("");
    info!("All done!");
    Ok(())
}

fn display_posts(posts: &[Post]) {
    for post in posts {
        match &post.repost_of {
            Some(original) => info!(
                "| {} reposted {} from {}: {}",
                post.user.username, original.id, original.user.username, post.caption
            ),
            None => info!(
                "| {} {} ({}): {}",
                post.id, post.user.username, post.media_type, post.caption
            ),
        }
        let shown = post.canonical();
        info!("|   {} likes, {} comments", shown.likes, shown.comments.len());
    }
}

async fn play_stories<B: Backend>(app: &Reconciler<B>) {
    let count = app.read(|state| state.stories.len());
    if !app.open_story(0) {
        info!("No stories");
        return;
    }

    let mut revisions = app.subscribe();
    let mut shown = None;
    loop {
        let active = app.read(|state| {
            state
                .active_story
                .and_then(|active| state.stories.get(active.index).cloned())
        });
        let Some(story) = active else {
            break;
        };
        if shown.as_ref() != Some(&story.id) {
            info!("{}: {}", story.user.username, story.image_url);
            shown = Some(story.id);
        }
        if revisions.changed().await.is_err() {
            break;
        }
    }
    info!("Watched {} stories", count);
}

fn report(outcome: Outcome) {
    if outcome.is_success() {
        info!("Done");
    } else {
        warn!("{:?}", outcome);
    }
}
