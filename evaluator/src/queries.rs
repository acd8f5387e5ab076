use medeval_core::qrels::Judgments;
use medeval_core::Topic;
use serde_json::{json, Value};

/// Every ranked-retrieval strategy keeps the engine's top 50 hits.
pub const TOP_K: usize = 50;

/// Boolean retrieval: the title must match; an abstract match is optional
/// but boosts the score 2x.
pub fn boolean(topic: &Topic) -> Value {
    json!({
        "size": TOP_K,
        "track_scores": true,
        "query": {
            "bool": {
                "must": { "match": { "title": { "query": topic.title } } },
                "should": { "match": { "abstract": { "query": topic.desc, "boost": 2 } } }
            }
        }
    })
}

/// Phrase retrieval: both the topic title and its description are run as
/// phrases against the title field, the title phrase boosted 2x.
pub fn phrase(topic: &Topic) -> Value {
    json!({
        "size": TOP_K,
        "track_scores": true,
        "query": {
            "bool": {
                "should": [
                    { "match_phrase": { "title": { "query": topic.title, "boost": 2 } } },
                    { "match_phrase": { "title": { "query": topic.desc } } }
                ]
            }
        }
    })
}

/// tf-idf retrieval under the engine's default similarity: title matched
/// against the topic title, abstract against the description boosted 2x.
pub fn tf_idf(topic: &Topic) -> Value {
    json!({
        "size": TOP_K,
        "query": {
            "bool": {
                "should": [
                    { "match": { "title": { "query": topic.title } } },
                    { "match": { "abstract": { "query": topic.desc, "boost": 2 } } }
                ]
            }
        }
    })
}

/// Custom scoring: a function_score over the two-field match, with weighted
/// functions gated on per-field filters and multiplicative combination.
pub fn custom(topic: &Topic) -> Value {
    json!({
        "size": TOP_K,
        "query": {
            "function_score": {
                "query": {
                    "bool": {
                        "should": [
                            { "match": { "title": { "query": topic.title } } },
                            { "match": { "abstract": { "query": topic.desc } } }
                        ]
                    }
                },
                "boost": 5,
                "functions": [
                    {
                        "filter": { "match": { "title": { "query": topic.title } } },
                        "random_score": {},
                        "weight": 20
                    },
                    {
                        "filter": { "match": { "abstract": { "query": topic.desc } } },
                        "weight": 40
                    }
                ],
                "max_boost": 42,
                "score_mode": "multiply",
                "boost_mode": "multiply"
            }
        }
    })
}

/// Rank-evaluation request: the topic title over [title, abstract], judged
/// against the supplied qrels rows, scored with MRR at cutoff 20.
pub fn rank_eval(index: &str, topic: &Topic, judgments: &Judgments) -> Value {
    let ratings: Vec<Value> = judgments
        .doc_ids
        .iter()
        .zip(&judgments.ratings)
        .map(|(doc_id, rating)| {
            json!({
                "_index": index,
                "_id": doc_id,
                "rating": rating.parse::<i64>().unwrap_or(0)
            })
        })
        .collect();
    json!({
        "requests": [{
            "id": topic.num,
            "request": {
                "query": {
                    "multi_match": {
                        "query": topic.title,
                        "fields": ["title", "abstract"]
                    }
                }
            },
            "ratings": ratings
        }],
        "metric": {
            "mean_reciprocal_rank": {
                "k": 20,
                "relevant_rating_threshold": 0
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic() -> Topic {
        Topic {
            num: "5".into(),
            title: "heart attack".into(),
            desc: "risk factors".into(),
        }
    }

    #[test]
    fn boolean_requires_title_and_boosts_abstract() {
        let body = boolean(&topic());
        assert_eq!(body["size"], 50);
        assert_eq!(body["track_scores"], true);
        let b = &body["query"]["bool"];
        assert_eq!(b["must"]["match"]["title"]["query"], "heart attack");
        assert_eq!(b["should"]["match"]["abstract"]["query"], "risk factors");
        assert_eq!(b["should"]["match"]["abstract"]["boost"], 2);
    }

    #[test]
    fn phrase_keeps_both_clauses() {
        let body = phrase(&topic());
        let should = body["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 2);
        assert_eq!(should[0]["match_phrase"]["title"]["query"], "heart attack");
        assert_eq!(should[0]["match_phrase"]["title"]["boost"], 2);
        assert_eq!(should[1]["match_phrase"]["title"]["query"], "risk factors");
    }

    #[test]
    fn tf_idf_matches_both_fields() {
        let body = tf_idf(&topic());
        let should = body["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 2);
        assert_eq!(should[0]["match"]["title"]["query"], "heart attack");
        assert_eq!(should[1]["match"]["abstract"]["boost"], 2);
        assert!(body.get("track_scores").is_none());
    }

    #[test]
    fn custom_combines_weighted_functions() {
        let body = custom(&topic());
        let fs = &body["query"]["function_score"];
        let functions = fs["functions"].as_array().unwrap();
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0]["weight"], 20);
        assert_eq!(functions[1]["weight"], 40);
        assert_eq!(fs["max_boost"], 42);
        assert_eq!(fs["score_mode"], "multiply");
        assert_eq!(fs["boost_mode"], "multiply");
        assert_eq!(fs["boost"], 5);
    }

    #[test]
    fn rank_eval_pairs_ratings_with_doc_ids() {
        let judgments = Judgments {
            ratings: vec!["1".into(), "2".into()],
            doc_ids: vec!["1234".into(), "5678".into()],
        };
        let body = rank_eval("med_documents_v1", &topic(), &judgments);
        let req = &body["requests"][0];
        assert_eq!(req["id"], "5");
        assert_eq!(
            req["request"]["query"]["multi_match"]["query"],
            "heart attack"
        );
        let ratings = req["ratings"].as_array().unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0]["_id"], "1234");
        assert_eq!(ratings[0]["rating"], 1);
        assert_eq!(ratings[1]["rating"], 2);
        assert_eq!(body["metric"]["mean_reciprocal_rank"]["k"], 20);
    }
}
