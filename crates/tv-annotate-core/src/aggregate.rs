//! Groups annotated broadcasts by film for presentation.

use std::collections::HashMap;
use tv_annotate_models::{AnnotatedBroadcast, BroadcastRef, GroupedFilm};

/// Collapse all annotated broadcasts of the same film into one group.
///
/// Grouping key is the English title when present, the broadcast title
/// otherwise; unannotated broadcasts are discarded. Film metadata comes from
/// the first-seen airing (it is invariant across airings of one film).
/// Broadcasts inside a group sort most recent first, and groups themselves
/// sort by their most recent airing. Cheap to recompute: callers may cache
/// the result behind a short TTL.
pub fn aggregate(broadcasts: &[AnnotatedBroadcast]) -> Vec<GroupedFilm> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, GroupedFilm> = HashMap::new();

    for item in broadcasts {
        let Some(oscar) = &item.oscar else {
            continue;
        };
        let key = if oscar.title_en.is_empty() {
            item.broadcast.title.clone()
        } else {
            oscar.title_en.clone()
        };

        let reference = BroadcastRef {
            channel_id: item.broadcast.channel_id.clone(),
            channel_name: item.broadcast.channel_name.clone(),
            channel_icon: item.broadcast.channel_icon.clone(),
            date: item.broadcast.date,
            time: item.broadcast.time,
        };

        match groups.get_mut(&key) {
            Some(group) => group.broadcasts.push(reference),
            None => {
                order.push(key.clone());
                groups.insert(
                    key,
                    GroupedFilm {
                        title: item.broadcast.title.clone(),
                        title_en: (!oscar.title_en.is_empty()).then(|| oscar.title_en.clone()),
                        year: oscar.year,
                        winner: oscar.winner,
                        nominee: oscar.nominee,
                        winner_categories: oscar.winner_categories.clone(),
                        nominee_categories: oscar.nominee_categories.clone(),
                        poster_path: oscar.poster_path.clone(),
                        overview: oscar.overview.clone(),
                        watch: oscar.watch.clone(),
                        broadcasts: vec![reference],
                    },
                );
            }
        }
    }

    let mut films: Vec<GroupedFilm> = order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect();
    for film in &mut films {
        film.broadcasts
            .sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
    }
    films.sort_by(|a, b| {
        let a_latest = a.broadcasts.first().map(|r| (r.date, r.time));
        let b_latest = b.broadcasts.first().map(|r| (r.date, r.time));
        b_latest
            .cmp(&a_latest)
            .then_with(|| a.title.cmp(&b.title))
    });
    films
}
