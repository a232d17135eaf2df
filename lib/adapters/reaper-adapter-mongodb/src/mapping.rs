//! Conversion between `currentOp` / `killOp` documents and domain types.

use anyhow::{Context, Result};
use mongodb::bson::{Bson, Document};
use tracing::debug;

use reaper_domain::{OpId, OpKind, Operation};

pub fn operations_from_reply(reply: &Document) -> Result<Vec<Operation>> {
    let inprog = reply
        .get_array("inprog")
        .context("currentOp reply has no inprog array")?;
    Ok(inprog
        .iter()
        .filter_map(|entry| match entry {
            Bson::Document(doc) => operation_from_document(doc),
            _ => None,
        })
        .collect())
}

/// Entries without a usable `opid` cannot be killed and are skipped.
pub fn operation_from_document(doc: &Document) -> Option<Operation> {
    let Some(opid) = doc.get("opid").and_then(opid_from_bson) else {
        debug!(entry = %doc, "skipping operation without opid");
        return None;
    };

    let kind = doc
        .get_str("op")
        .map(OpKind::from_raw)
        .unwrap_or(OpKind::Other);
    let client = doc
        .get_str("client")
        .or_else(|_| doc.get_str("client_s"))
        .unwrap_or_default()
        .to_string();
    let secs_running = doc.get("secs_running").map(secs_from_bson).unwrap_or(0);
    let command = doc
        .get("command")
        .cloned()
        .map(Bson::into_relaxed_extjson)
        .unwrap_or(serde_json::Value::Null);
    let active = doc.get_bool("active").unwrap_or(false);

    Some(Operation {
        opid,
        kind,
        client,
        secs_running,
        command,
        active,
    })
}

fn opid_from_bson(value: &Bson) -> Option<OpId> {
    match value {
        Bson::Int32(id) => Some(OpId::Int(i64::from(*id))),
        Bson::Int64(id) => Some(OpId::Int(*id)),
        Bson::String(id) => Some(OpId::Str(id.clone())),
        _ => None,
    }
}

pub fn opid_to_bson(opid: &OpId) -> Bson {
    match opid {
        OpId::Int(id) => match i32::try_from(*id) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(*id),
        },
        OpId::Str(id) => Bson::String(id.clone()),
    }
}

fn secs_from_bson(value: &Bson) -> u64 {
    match value {
        Bson::Int32(secs) => u64::try_from(*secs).unwrap_or(0),
        Bson::Int64(secs) => u64::try_from(*secs).unwrap_or(0),
        // Rounded up so a fractional duration past the threshold still
        // compares greater than it.
        Bson::Double(secs) if *secs > 0.0 => secs.ceil() as u64,
        _ => 0,
    }
}

pub fn reply_ok(reply: &Document) -> bool {
    match reply.get("ok") {
        Some(Bson::Double(ok)) => *ok == 1.0,
        Some(Bson::Int32(ok)) => *ok == 1,
        Some(Bson::Int64(ok)) => *ok == 1,
        Some(Bson::Boolean(ok)) => *ok,
        _ => false,
    }
}
