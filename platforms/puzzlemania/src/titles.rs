//! Static activity-title translation table
//!
//! Maps the platform's canonical English activity titles to their localized
//! strings. Unknown titles pass through unchanged.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static TITLE_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Campaign Registration", "活动注册"),
        ("Use a friend's referral code", "使用好友邀请码"),
        (
            "Mint 0G Puzzle Mania Commemorative NFT",
            "铸造0G Puzzle Mania纪念NFT",
        ),
        (
            "Follow Michael Heinrich - CEO, 0G Labs",
            "关注Michael Heinrich - 0G Labs CEO",
        ),
        ("Follow 0G Foundation", "关注0G基金会"),
        ("Follow Ming Wu - CTO, 0G Labs", "关注Ming Wu - 0G Labs CTO"),
        ("Follow 0G Labs", "关注0G Labs"),
        ("Like: Hype up Guild on 0G projects!", "点赞：0G项目公会"),
        (
            "Follow One Gravity - the first NFT collection on 0G",
            "关注One Gravity - 0G首个NFT系列",
        ),
        ("RT: Hype up Guild on 0G projects!", "转发：0G项目公会"),
        ("Follow AI Verse - coming soon.", "关注AI Verse - 即将推出"),
        ("Like: Support One Gravity", "点赞：支持One Gravity"),
        (
            "Follow Battle of Agents - coming soon.",
            "关注Battle of Agents - 即将推出",
        ),
        ("RT: Support One Gravity", "转发：支持One Gravity"),
        ("RT: You Need Decentralized AI", "转发：你需要去中心化AI"),
        (
            "RT: Battle of Agents is coming soon.",
            "转发：Battle of Agents即将推出",
        ),
        ("Like: 600K strong on X!", "点赞：X平台60万粉丝"),
        (
            "Like: Guild on 0G with Michael!",
            "点赞：与Michael一起加入0G公会",
        ),
        ("RT: 600K strong on X!", "转发：X平台60万粉丝"),
        (
            "RT: Guild on 0G with Michael!",
            "转发：与Michael一起加入0G公会",
        ),
        ("Like: Learn from Ming", "点赞：向Ming学习"),
        ("Follow 0G Labs on Farcaster", "在Farcaster关注0G Labs"),
        ("Like: You Need Decentralized AI", "点赞：你需要去中心化AI"),
        ("RT: Learn from Ming", "转发：向Ming学习"),
        ("Like: Guild on 0G Farcaster", "点赞：在Farcaster加入0G公会"),
        ("Refer a friend", "邀请好友"),
        (
            "Like: Battle of Agents is coming soon.",
            "点赞：Battle of Agents即将推出",
        ),
        ("RT: Guild on 0G Farcaster", "转发：在Farcaster加入0G公会"),
    ])
});

/// Localized rendering of an activity title, identity fallback for unknowns.
pub fn localized_title(title: &str) -> &str {
    TITLE_MAP.get(title).copied().unwrap_or(title)
}
