// Pipelines: the two user flows, each a single synchronous batch.
//
// generate: backlink exports -> disavow list + detail workbook
// merge:    reviewed workbook + existing disavow file -> merged disavow file

pub mod generate;
pub mod merge;
