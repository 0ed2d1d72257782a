//! Rendering of compiled plans into the engine's aggregation pipeline

use crate::query::{Clause, QueryPlan, SearchStage, Stage};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Bson, DateTime as BsonDateTime, Document};

/// Render a plan as aggregation stages against the given search index
pub fn render_pipeline(plan: &QueryPlan, index: &str) -> Vec<Document> {
    plan.iter().map(|stage| render_stage(stage, index)).collect()
}

fn render_stage(stage: &Stage, index: &str) -> Document {
    match stage {
        Stage::Search(search) => render_search(search, index),
        Stage::Sort { field, ascending } => {
            let mut order = Document::new();
            order.insert(field.clone(), if *ascending { 1 } else { -1 });
            doc! { "$sort": order }
        }
        // BSON has no unsigned 64-bit integer
        Stage::Skip { count } => doc! { "$skip": i64::try_from(*count).unwrap_or(i64::MAX) },
        Stage::Limit { count } => doc! { "$limit": i64::from(*count) },
        Stage::Annotate {
            score_field,
            highlight_field,
        } => {
            let mut fields = Document::new();
            fields.insert(score_field.clone(), doc! { "$meta": "searchScore" });
            fields.insert(highlight_field.clone(), doc! { "$meta": "searchHighlights" });
            doc! { "$set": fields }
        }
    }
}

fn render_search(search: &SearchStage, index: &str) -> Document {
    // The engine rejects empty operator arrays inside `compound`
    let mut compound = Document::new();
    for (key, clauses) in [
        ("filter", &search.filter),
        ("should", &search.should),
        ("must", &search.must),
    ] {
        if !clauses.is_empty() {
            compound.insert(key, render_clauses(clauses));
        }
    }

    doc! {
        "$search": {
            "index": index,
            "compound": compound,
            "highlight": { "path": search.highlight_paths.clone() },
        }
    }
}

fn render_clauses(clauses: &[Clause]) -> Vec<Document> {
    clauses.iter().map(render_clause).collect()
}

fn render_clause(clause: &Clause) -> Document {
    match clause {
        Clause::Text(text) => doc! {
            "text": { "path": text.path.as_str(), "query": text.query.as_str() }
        },
        Clause::Fuzzy(fuzzy) => doc! {
            "autocomplete": {
                "query": fuzzy.query.as_str(),
                "path": fuzzy.path.as_str(),
                "fuzzy": { "maxEdits": i32::from(fuzzy.max_edits) },
            }
        },
        Clause::Range(range) => {
            let mut body = doc! { "path": range.path.as_str() };
            if let Some(gte) = range.gte {
                body.insert("gte", bson_date(gte));
            }
            if let Some(lt) = range.lt {
                body.insert("lt", bson_date(lt));
            }
            doc! { "range": body }
        }
    }
}

fn bson_date(date: DateTime<Utc>) -> Bson {
    Bson::DateTime(BsonDateTime::from_millis(date.timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{compile, SearchRequest};

    /// Top-level operator of each rendered stage, e.g. `$search`
    fn operators(pipeline: &[Document]) -> Vec<&str> {
        pipeline
            .iter()
            .filter_map(|stage| stage.keys().next().map(String::as_str))
            .collect()
    }

    fn compound(pipeline: &[Document]) -> &Document {
        pipeline[0]
            .get_document("$search")
            .unwrap()
            .get_document("compound")
            .unwrap()
    }

    #[test]
    fn test_stage_operators_in_order() {
        let plan = compile(&SearchRequest::new("x").with_sort("name"));
        let pipeline = render_pipeline(&plan, "fuzzy_search");
        assert_eq!(
            operators(&pipeline),
            vec!["$search", "$sort", "$skip", "$limit", "$set"]
        );

        let plan = compile(&SearchRequest::new("x"));
        let pipeline = render_pipeline(&plan, "fuzzy_search");
        assert_eq!(operators(&pipeline), vec!["$search", "$skip", "$limit", "$set"]);
    }

    #[test]
    fn test_render_search_stage() {
        let plan = compile(
            &SearchRequest::new("soil")
                .with_provider("CUAHSI")
                .with_published(Some(2010), Some(2015)),
        );
        let pipeline = render_pipeline(&plan, "fuzzy_search");
        let search = pipeline[0].get_document("$search").unwrap();
        let compound = compound(&pipeline);

        assert_eq!(search.get_str("index").unwrap(), "fuzzy_search");
        assert_eq!(
            compound.get_array("should").unwrap()[0],
            Bson::Document(doc! {
                "autocomplete": {"query": "soil", "path": "name", "fuzzy": {"maxEdits": 1}}
            })
        );
        assert_eq!(
            compound.get_array("must").unwrap(),
            &vec![Bson::Document(doc! {"text": {"path": "provider.name", "query": "CUAHSI"}})]
        );

        let filter = compound.get_array("filter").unwrap();
        assert_eq!(filter.len(), 1);
        let range = filter[0].as_document().unwrap().get_document("range").unwrap();
        assert_eq!(range.get_str("path").unwrap(), "datePublished");
        // 2010-01-01T00:00:00Z and 2016-01-01T00:00:00Z
        assert_eq!(range.get_datetime("gte").unwrap().timestamp_millis(), 1_262_304_000_000);
        assert_eq!(range.get_datetime("lt").unwrap().timestamp_millis(), 1_451_606_400_000);

        let highlight = search.get_document("highlight").unwrap();
        assert_eq!(
            highlight.get_array("path").unwrap(),
            &vec![
                Bson::from("name"),
                Bson::from("description"),
                Bson::from("keywords"),
                Bson::from("creator.@list.name"),
            ]
        );
    }

    #[test]
    fn test_degenerate_request_omits_empty_operators() {
        let pipeline = render_pipeline(&compile(&SearchRequest::new("x")), "idx");
        let compound = compound(&pipeline);

        assert!(!compound.contains_key("must"));
        assert!(!compound.contains_key("filter"));
        assert_eq!(compound.get_array("should").unwrap().len(), 3);
    }

    #[test]
    fn test_render_pagination_and_annotation() {
        let plan = compile(&SearchRequest::new("x").with_sort("datePublished").with_page(3, 20));
        let pipeline = render_pipeline(&plan, "idx");

        assert_eq!(pipeline[1], doc! {"$sort": {"datePublished": 1}});
        assert_eq!(pipeline[2], doc! {"$skip": 40_i64});
        assert_eq!(pipeline[3], doc! {"$limit": 20_i64});
        assert_eq!(
            pipeline[4],
            doc! {"$set": {
                "score": {"$meta": "searchScore"},
                "highlights": {"$meta": "searchHighlights"}
            }}
        );
    }

    #[test]
    fn test_open_range_omits_bound() {
        let plan = compile(&SearchRequest::new("x").with_coverage(Some(1990), None));
        let pipeline = render_pipeline(&plan, "idx");
        let filter = compound(&pipeline).get_array("filter").unwrap();
        let range = filter[0].as_document().unwrap().get_document("range").unwrap();

        assert_eq!(range.get_str("path").unwrap(), "temporalCoverage.start");
        assert!(!range.contains_key("lt"));
        // 1990-01-01T00:00:00Z
        assert_eq!(range.get_datetime("gte").unwrap().timestamp_millis(), 631_152_000_000);
    }
}
