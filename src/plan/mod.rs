use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Graphic,
    Reel,
}

impl PostType {
    pub fn as_str(self) -> &'static str {
        match self {
            PostType::Graphic => "graphic",
            PostType::Reel => "reel",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned social post. Only built from candidates that passed [`is_valid_post`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub month: String,
    pub post_type: PostType,
    pub tags: Vec<String>,
    pub title: String,
    pub content: String,
    pub caption: String,
    pub visual_suggestion: String,
    pub hashtags: Vec<String>,
    pub cta: String,
}

/// Maximum posts of each type to keep per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quota {
    pub graphics_per_month: usize,
    pub reels_per_month: usize,
}

impl Quota {
    pub fn limit(&self, kind: PostType) -> usize {
        match kind {
            PostType::Graphic => self.graphics_per_month,
            PostType::Reel => self.reels_per_month,
        }
    }
}

fn non_empty_str(v: &Value, key: &str) -> bool {
    v.get(key).and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

fn non_empty_array(v: &Value, key: &str) -> bool {
    v.get(key).and_then(Value::as_array).is_some_and(|a| !a.is_empty())
}

/// Shape check for one untrusted candidate record.
///
/// Every text field must be a non-empty string, `tags` and `hashtags` non-empty
/// arrays, and `postType` one of `"graphic"` / `"reel"`. Never errors.
pub fn is_valid_post(candidate: &Value) -> bool {
    const TEXT: [&str; 6] = ["month", "title", "content", "caption", "visualSuggestion", "cta"];
    const LISTS: [&str; 2] = ["tags", "hashtags"];

    candidate.is_object()
        && matches!(
            candidate.get("postType").and_then(Value::as_str),
            Some("graphic") | Some("reel")
        )
        && TEXT.iter().all(|k| non_empty_str(candidate, k))
        && LISTS.iter().all(|k| non_empty_array(candidate, k))
}

/// Shape-validates and types each candidate, silently dropping the rest.
/// A record whose `tags` or `hashtags` hold non-strings passes the shape check
/// but fails typing, so it is dropped too.
/// Returns the admitted posts and how many candidates were dropped.
pub fn admit(candidates: &[Value]) -> (Vec<Post>, usize) {
    let mut posts = Vec::with_capacity(candidates.len());
    let mut rejected = 0usize;
    for (idx, c) in candidates.iter().enumerate() {
        let typed = if is_valid_post(c) {
            serde_json::from_value::<Post>(c.clone()).ok()
        } else {
            None
        };
        match typed {
            Some(p) => posts.push(p),
            None => {
                debug!(index = idx, "candidate_rejected");
                rejected += 1;
            }
        }
    }
    (posts, rejected)
}

/// Groups posts by month label in first-seen order, keeping input order inside
/// each group.
pub fn group_by_month<'a>(posts: &'a [Post]) -> Vec<(&'a str, Vec<&'a Post>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Post>)> = Vec::new();
    for p in posts {
        let slot = *index.entry(p.month.as_str()).or_insert_with(|| {
            groups.push((p.month.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(p);
    }
    groups
}

/// Caps each month at `quota` graphics and reels.
///
/// Per month the first N graphics come first, then the first M reels; months
/// follow first-seen order. Short months are kept as-is, never padded.
pub fn normalize(posts: &[Post], quota: Quota) -> Vec<Post> {
    let mut out = Vec::with_capacity(posts.len());
    for (_, month_posts) in group_by_month(posts) {
        for kind in [PostType::Graphic, PostType::Reel] {
            out.extend(
                month_posts
                    .iter()
                    .filter(|p| p.post_type == kind)
                    .take(quota.limit(kind))
                    .map(|p| (*p).clone()),
            );
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthCounts {
    pub graphics: usize,
    pub reels: usize,
}

/// The normalized plan plus how many raw candidates failed the shape check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPlan {
    pub posts: Vec<Post>,
    pub rejected: usize,
}

impl ContentPlan {
    /// A missing candidate list is an empty plan, not an error.
    pub fn from_candidates(candidates: Option<&[Value]>, quota: Quota) -> Self {
        let candidates = candidates.unwrap_or_default();
        let (valid, rejected) = admit(candidates);
        let posts = normalize(&valid, quota);
        debug!(
            candidates = candidates.len(),
            rejected,
            trimmed = valid.len() - posts.len(),
            kept = posts.len(),
            "plan_normalized"
        );
        Self { posts, rejected }
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn months(&self) -> Vec<(&str, Vec<&Post>)> {
        group_by_month(&self.posts)
    }

    pub fn counts(&self) -> Vec<(&str, MonthCounts)> {
        self.months()
            .into_iter()
            .map(|(m, posts)| {
                let graphics = posts.iter().filter(|p| p.post_type == PostType::Graphic).count();
                (m, MonthCounts { graphics, reels: posts.len() - graphics })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(month: &str, kind: &str, title: &str) -> Value {
        json!({
            "month": month,
            "postType": kind,
            "tags": ["Featured Service"],
            "title": title,
            "content": "We roast every morning.",
            "caption": "Come by and taste it!",
            "visualSuggestion": "Steam over a fresh cup",
            "hashtags": ["#AnytownUSA", "#CoffeeShop", "#Roast"],
            "cta": "Visit us today"
        })
    }

    fn post(month: &str, kind: PostType, title: &str) -> Post {
        serde_json::from_value(raw(month, kind.as_str(), title)).unwrap()
    }

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    fn quota(g: usize, r: usize) -> Quota {
        Quota { graphics_per_month: g, reels_per_month: r }
    }

    #[test]
    fn accepts_complete_record() {
        assert!(is_valid_post(&raw("June", "graphic", "t")));
        assert!(is_valid_post(&raw("Month 2", "reel", "t")));
    }

    #[test]
    fn rejects_each_missing_field() {
        let fields = [
            "month", "postType", "tags", "title", "content", "caption", "visualSuggestion", "hashtags", "cta",
        ];
        for f in fields {
            let mut v = raw("June", "graphic", "t");
            v.as_object_mut().unwrap().remove(f);
            assert!(!is_valid_post(&v), "accepted record without {f}");
        }
    }

    #[test]
    fn rejects_empty_and_wrong_typed_fields() {
        for (k, bad) in [
            ("month", json!("")),
            ("title", json!("")),
            ("cta", json!(42)),
            ("caption", Value::Null),
            ("tags", json!([])),
            ("hashtags", json!("#one")),
            ("postType", json!("carousel")),
            ("postType", json!("Graphic")),
        ] {
            let mut v = raw("June", "graphic", "t");
            v[k] = bad.clone();
            assert!(!is_valid_post(&v), "accepted {k} = {bad}");
        }
        assert!(!is_valid_post(&json!(["not", "an", "object"])));
        assert!(!is_valid_post(&Value::Null));
    }

    #[test]
    fn admit_drops_malformed_and_counts_them() {
        let mut bad_tags = raw("June", "reel", "b");
        bad_tags["tags"] = json!([1, 2]);
        let candidates = vec![raw("June", "graphic", "a"), json!({}), bad_tags, raw("July", "reel", "c")];
        let (posts, rejected) = admit(&candidates);
        assert_eq!(titles(&posts), vec!["a", "c"]);
        assert_eq!(rejected, 2);
    }

    #[test]
    fn june_five_graphics_three_reels_capped_at_two_each() {
        let mut input = Vec::new();
        for i in 0..5 {
            input.push(post("June", PostType::Graphic, &format!("g{i}")));
        }
        for i in 0..3 {
            input.push(post("June", PostType::Reel, &format!("r{i}")));
        }
        let out = normalize(&input, quota(2, 2));
        assert_eq!(titles(&out), vec!["g0", "g1", "r0", "r1"]);
    }

    #[test]
    fn short_months_are_not_padded() {
        let input = vec![post("June", PostType::Graphic, "a"), post("July", PostType::Graphic, "b")];
        let out = normalize(&input, quota(3, 0));
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(normalize(&[], quota(4, 4)).is_empty());
        let plan = ContentPlan::from_candidates(None, quota(4, 4));
        assert!(plan.is_empty());
        assert_eq!(plan.rejected, 0);
    }

    #[test]
    fn zero_quota_removes_that_type_everywhere() {
        let input = vec![
            post("June", PostType::Graphic, "g1"),
            post("June", PostType::Reel, "r1"),
            post("July", PostType::Reel, "r2"),
            post("July", PostType::Graphic, "g2"),
        ];
        let out = normalize(&input, quota(0, 5));
        assert!(out.iter().all(|p| p.post_type == PostType::Reel));
        assert_eq!(titles(&out), vec!["r1", "r2"]);

        let out = normalize(&input, quota(5, 0));
        assert!(out.iter().all(|p| p.post_type == PostType::Graphic));
    }

    #[test]
    fn interleaved_months_keep_first_seen_order_and_intra_month_order() {
        let input = vec![
            post("July", PostType::Reel, "j-r1"),
            post("June", PostType::Graphic, "n-g1"),
            post("July", PostType::Graphic, "j-g1"),
            post("June", PostType::Graphic, "n-g2"),
            post("July", PostType::Reel, "j-r2"),
            post("July", PostType::Graphic, "j-g2"),
        ];
        let out = normalize(&input, quota(1, 5));
        assert_eq!(titles(&out), vec!["j-g1", "j-r1", "j-r2", "n-g1"]);
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let mut input = Vec::new();
        for m in ["Month 1", "Month 2", "Month 3"] {
            for i in 0..4 {
                input.push(post(m, PostType::Reel, &format!("{m}-r{i}")));
                input.push(post(m, PostType::Graphic, &format!("{m}-g{i}")));
            }
        }
        let q = quota(3, 2);
        let once = normalize(&input, q);
        assert_eq!(normalize(&once, q), once);
    }

    #[test]
    fn per_month_counts_never_exceed_quota_or_supply() {
        let input = vec![
            post("Aug", PostType::Graphic, "1"),
            post("Aug", PostType::Reel, "2"),
            post("Sep", PostType::Graphic, "3"),
            post("Aug", PostType::Graphic, "4"),
            post("Sep", PostType::Graphic, "5"),
            post("Aug", PostType::Graphic, "6"),
        ];
        for (g, r) in [(0, 0), (1, 1), (2, 0), (5, 5)] {
            let q = quota(g, r);
            let out = normalize(&input, q);
            for (month, posts) in group_by_month(&out) {
                for kind in [PostType::Graphic, PostType::Reel] {
                    let kept = posts.iter().filter(|p| p.post_type == kind).count();
                    let supply = input.iter().filter(|p| p.month == month && p.post_type == kind).count();
                    assert!(kept <= q.limit(kind));
                    assert_eq!(kept, supply.min(q.limit(kind)));
                }
            }
        }
    }

    #[test]
    fn plan_counts_by_month() {
        let candidates = vec![
            raw("Aug", "graphic", "a"),
            raw("Aug", "reel", "b"),
            raw("Sep", "reel", "c"),
            raw("Sep", "reel", "d"),
            json!({"month": "Sep"}),
        ];
        let plan = ContentPlan::from_candidates(Some(&candidates), quota(2, 1));
        assert_eq!(plan.rejected, 1);
        assert_eq!(
            plan.counts(),
            vec![
                ("Aug", MonthCounts { graphics: 1, reels: 1 }),
                ("Sep", MonthCounts { graphics: 0, reels: 1 }),
            ]
        );
    }
}
