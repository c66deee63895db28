use client_core::{news::NewsPager, BlogPost};
use shared::{
    domain::Tab,
    protocol::{AnalyticsData, ArticleStats, NewsItem, UserSettings},
};

const CHART_LABEL_CHARS: usize = 20;

pub fn posts(tab: Tab, posts: &[BlogPost]) {
    match tab {
        Tab::Published => println!("Published posts"),
        _ => println!("Awaiting review"),
    }
    if posts.is_empty() {
        println!("No posts.");
        return;
    }
    for post in posts {
        println!(
            "{:>6}  {:<12}  viral {:>3}  {}",
            post.id,
            post.status.as_str(),
            post.viral_score,
            post.title
        );
    }
}

pub fn post_detail(post: &BlogPost) {
    println!("{} [{}]", post.title, post.id);
    println!("  status:    {}", post.status.as_str());
    println!("  viral:     {}/100", post.viral_score);
    println!("  sentiment: {}", post.sentiment.as_str());
    if !post.target_audience.is_empty() {
        println!("  audience:  {}", post.target_audience);
    }
    println!("  reading:   {} min", post.reading_time_min);
    if !post.seo_keywords.is_empty() {
        println!("  keywords:  {}", post.seo_keywords.join(", "));
    }
    if !post.meta_description.is_empty() {
        println!("  meta:      {}", post.meta_description);
    }
    if !post.critique_notes.is_empty() {
        println!("  critique:  {}", post.critique_notes);
    }
    println!("  image:     {}", post.image_url);
}

pub fn news(items: &[NewsItem], page: usize, pager: &NewsPager) {
    if items.is_empty() {
        println!("No news on page {page}.");
        return;
    }
    for item in items {
        let date = item
            .published_at_utc()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| item.published_at.clone());
        println!("{date}  {}  ({})", item.title, item.source);
        println!("    {}", item.url);
    }
    println!("page {page}, {} stories fetched", pager.total());
}

fn article_rows(platform: &str, articles: &[ArticleStats]) {
    for article in articles {
        println!(
            "  {platform:<9} {:<23} {:>7} views {:>5} reactions {:>5} comments",
            article.short_title(CHART_LABEL_CHARS),
            article.views,
            article.reactions,
            article.comments
        );
    }
}

pub fn analytics(data: &AnalyticsData, settings: &UserSettings) {
    println!(
        "Totals: {} views, {} reactions, {} comments",
        data.totals.views, data.totals.reactions, data.totals.comments
    );
    if settings.devto_configured {
        article_rows("Dev.to", &data.devto);
    } else {
        println!("  Dev.to    not connected");
    }
    if settings.hashnode_configured {
        article_rows("Hashnode", &data.hashnode);
    } else {
        println!("  Hashnode  not connected");
    }
}

fn connected(flag: bool) -> &'static str {
    if flag {
        "connected"
    } else {
        "not connected"
    }
}

pub fn settings(settings: &UserSettings) {
    println!("Dev.to:   {}", connected(settings.devto_configured));
    println!("Hashnode: {}", connected(settings.hashnode_configured));
    if let Some(pub_id) = settings.hashnode_pub_id.as_deref().filter(|id| !id.is_empty()) {
        println!("Hashnode publication: {pub_id}");
    }
}
