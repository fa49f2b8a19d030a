use super::{
    referral_service::{ReferralService, ReferralServiceTrait},
    tree::{total_commission, ReferralTreeResolver, MAX_REFERRAL_DEPTH},
};
use crate::test_support::{base_time, MemoryStore};
use async_trait::async_trait;
use chrono::Duration;
use database::referral::{
    model::Referral,
    repository::{DynReferralRepository, ReferralRepositoryTrait},
};
use mongodb::bson::oid::ObjectId;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
    sync::Arc,
};
use utils::{AppError, AppResult};

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn service(store: &Arc<MemoryStore>) -> ReferralService {
    ReferralService::new(store.clone(), store.clone())
}

fn resolver(store: &Arc<MemoryStore>) -> ReferralTreeResolver {
    ReferralTreeResolver::new(store.clone(), store.clone())
}

#[tokio::test]
async fn test_chain_is_cut_at_depth_three() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", Some("A"));
    let b = store.add_user("+910000000002", Some("B"));
    let c = store.add_user("+910000000003", Some("C"));
    let d = store.add_user("+910000000004", Some("D"));
    let e = store.add_user("+910000000005", Some("E"));
    store.add_edge(&a, &b, 1, "10.00", 0);
    store.add_edge(&b, &c, 2, "5.00", 1);
    store.add_edge(&c, &d, 3, "2.50", 2);
    store.add_edge(&d, &e, 1, "1.00", 3);

    let tree = resolver(&store).resolve(&a).await.unwrap();

    let visited: Vec<(&str, u8)> = tree
        .nodes
        .iter()
        .map(|n| (n.referred_phone.as_str(), n.depth))
        .collect();
    assert_eq!(
        visited,
        vec![("+910000000002", 1), ("+910000000003", 2), ("+910000000004", 3)]
    );
    assert_eq!(tree.total_commission, dec("17.50"));

    // 第 3 层节点的出边不会被查询
    assert_eq!(store.edge_queries(), vec![a, b, c]);
    assert!(!store.edge_queries().contains(&d));
}

#[tokio::test]
async fn test_two_cycle_terminates() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", Some("A"));
    let b = store.add_user("+910000000002", Some("B"));
    store.add_edge(&a, &b, 1, "10.00", 0);
    store.add_edge(&b, &a, 1, "10.00", 1);

    let tree = resolver(&store).resolve(&a).await.unwrap();

    assert_eq!(tree.nodes.len(), 1);
    assert_eq!(tree.nodes[0].edge.referred_id, b);
    assert_eq!(tree.nodes[0].depth, 1);
    assert_eq!(tree.total_commission, dec("10.00"));
}

#[tokio::test]
async fn test_diamond_keeps_every_path() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", None);
    let c = store.add_user("+910000000003", None);
    let d = store.add_user("+910000000004", None);
    store.add_edge(&a, &b, 1, "1", 0);
    store.add_edge(&a, &c, 1, "2", 1);
    store.add_edge(&c, &d, 2, "4", 2);
    store.add_edge(&b, &d, 2, "8", 3);

    let tree = resolver(&store).resolve(&a).await.unwrap();

    let order: Vec<(ObjectId, ObjectId, u8)> = tree
        .nodes
        .iter()
        .map(|n| (n.edge.referrer_id, n.edge.referred_id, n.depth))
        .collect();
    assert_eq!(order, vec![(a, b, 1), (a, c, 1), (c, d, 2), (b, d, 2)]);
    assert_eq!(tree.total_commission, dec("15"));
}

#[tokio::test]
async fn test_shortcut_edge_does_not_hide_longer_path() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", None);
    let c = store.add_user("+910000000003", None);
    store.add_edge(&a, &b, 1, "1", 0);
    store.add_edge(&b, &c, 2, "5", 1);
    store.add_edge(&a, &c, 1, "2", 2);

    let tree = resolver(&store).resolve(&a).await.unwrap();

    let order: Vec<(ObjectId, ObjectId, u8)> = tree
        .nodes
        .iter()
        .map(|n| (n.edge.referrer_id, n.edge.referred_id, n.depth))
        .collect();
    assert_eq!(order, vec![(a, b, 1), (a, c, 1), (b, c, 2)]);
    assert_eq!(tree.total_commission, dec("8"));
}

#[tokio::test]
async fn test_shared_descendant_is_expanded_on_each_path() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", None);
    let c = store.add_user("+910000000003", None);
    let d = store.add_user("+910000000004", None);
    let e = store.add_user("+910000000005", None);
    store.add_edge(&a, &b, 1, "1", 0);
    store.add_edge(&a, &c, 1, "2", 1);
    store.add_edge(&b, &d, 2, "4", 2);
    store.add_edge(&c, &d, 2, "8", 3);
    let d_to_e = store.add_edge(&d, &e, 3, "16", 4);

    let tree = resolver(&store).resolve(&a).await.unwrap();

    let depths: Vec<u8> = tree.nodes.iter().map(|n| n.depth).collect();
    assert_eq!(depths, vec![1, 1, 2, 2, 3, 3]);
    let third: Vec<ObjectId> = tree.nodes[4..].iter().map(|n| n.edge.id).collect();
    assert_eq!(third, vec![d_to_e, d_to_e]);
    assert_eq!(tree.total_commission, dec("47"));

    // d 经两条路径到达，出边只查询一次；e 在第 3 层，不再展开
    assert_eq!(store.edge_queries(), vec![a, b, c, d]);
}

#[tokio::test]
async fn test_cycle_back_to_root_stops_on_path() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", None);
    let c = store.add_user("+910000000003", None);
    store.add_edge(&a, &b, 1, "1", 0);
    store.add_edge(&b, &c, 2, "2", 1);
    store.add_edge(&c, &a, 3, "4", 2);
    store.add_edge(&c, &b, 3, "8", 3);

    let tree = resolver(&store).resolve(&a).await.unwrap();

    let order: Vec<(ObjectId, u8)> = tree.nodes.iter().map(|n| (n.edge.referred_id, n.depth)).collect();
    assert_eq!(order, vec![(b, 1), (c, 2)]);
    assert_eq!(tree.total_commission, dec("3"));
}

#[tokio::test]
async fn test_ordering_by_depth_then_created_at() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", None);
    let c = store.add_user("+910000000003", None);
    let d = store.add_user("+910000000004", None);
    let e = store.add_user("+910000000005", None);
    store.add_edge(&a, &c, 1, "1", 5);
    store.add_edge(&a, &b, 1, "1", 1);
    store.add_edge(&c, &e, 2, "1", 2);
    store.add_edge(&b, &d, 2, "1", 0);

    let tree = resolver(&store).resolve(&a).await.unwrap();

    let order: Vec<(ObjectId, u8)> = tree.nodes.iter().map(|n| (n.edge.referred_id, n.depth)).collect();
    assert_eq!(order, vec![(b, 1), (c, 1), (d, 2), (e, 2)]);
}

#[tokio::test]
async fn test_empty_tree_and_unknown_root() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);

    let tree = resolver(&store).resolve(&a).await.unwrap();
    assert!(tree.nodes.is_empty());
    assert_eq!(tree.total_commission, Decimal::ZERO);

    let err = resolver(&store).resolve(&ObjectId::new()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_dangling_edge_is_skipped() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", None);
    store.add_edge(&a, &ObjectId::new(), 1, "3", 0);
    store.add_edge(&a, &b, 1, "4", 1);

    let tree = resolver(&store).resolve(&a).await.unwrap();
    assert_eq!(tree.nodes.len(), 1);
    assert_eq!(tree.total_commission, dec("4"));
}

#[tokio::test]
async fn test_store_failure_returns_no_partial_tree() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", None);
    let c = store.add_user("+910000000003", None);
    store.add_edge(&a, &b, 1, "1", 0);
    store.add_edge(&b, &c, 2, "1", 1);
    store.fail_edges_after(1);

    let err = resolver(&store).resolve(&a).await.unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
}

#[tokio::test]
async fn test_create_referral_success() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", Some("B"));

    let id = service(&store)
        .create_referral(&a, " +910000000002 ", 2, dec("12.75"))
        .await
        .unwrap();

    let stored = store.referrals();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].referrer_id, a);
    assert_eq!(stored[0].referred_id, b);
    assert_eq!(stored[0].level, 2);
    assert_eq!(stored[0].commission, dec("12.75"));
}

#[tokio::test]
async fn test_create_referral_rejections() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    store.add_user("+910000000002", None);
    let svc = service(&store);

    for level in [0, 4, -1, 300] {
        let err = svc.create_referral(&a, "+910000000002", level, Decimal::ONE).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "level {}", level);
    }

    let err = svc
        .create_referral(&a, "+910000000002", 1, dec("-0.01"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = svc
        .create_referral(&a, "+919999999999", 1, Decimal::ONE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // 自己推荐自己
    let err = svc
        .create_referral(&a, "+910000000001", 1, Decimal::ONE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(store.referral_count(), 0);
}

#[tokio::test]
async fn test_zero_commission_is_allowed() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    store.add_user("+910000000002", None);

    assert!(service(&store)
        .create_referral(&a, "+910000000002", 3, Decimal::ZERO)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_duplicate_referral_leaves_store_unchanged() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    store.add_user("+910000000002", None);
    let svc = service(&store);

    svc.create_referral(&a, "+910000000002", 1, dec("10")).await.unwrap();
    let before = store.referrals();

    let err = svc
        .create_referral(&a, "+910000000002", 2, dec("99"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.referrals(), before);
}

/// find_referral 总是未命中，模拟并发创建在写入时才撞上唯一索引
struct RacingReferrals {
    inner: Arc<MemoryStore>,
}

#[async_trait]
impl ReferralRepositoryTrait for RacingReferrals {
    async fn insert_referral(&self, referral: Referral) -> AppResult<ObjectId> {
        self.inner.insert_referral(referral).await
    }

    async fn find_referral(&self, _referrer_id: &ObjectId, _referred_id: &ObjectId) -> AppResult<Option<Referral>> {
        Ok(None)
    }

    async fn edges_from(&self, referrer_id: &ObjectId) -> AppResult<Vec<Referral>> {
        self.inner.edges_from(referrer_id).await
    }

    async fn count_referrals_from(&self, referrer_id: &ObjectId) -> AppResult<u64> {
        self.inner.count_referrals_from(referrer_id).await
    }
}

#[tokio::test]
async fn test_unique_violation_maps_to_conflict() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    let b = store.add_user("+910000000002", None);
    store.add_edge(&a, &b, 1, "10", 0);

    let referrals: DynReferralRepository = Arc::new(RacingReferrals { inner: store.clone() });
    let svc = ReferralService::new(store.clone(), referrals);

    let err = svc
        .create_referral(&a, "+910000000002", 1, dec("10"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.referral_count(), 1);
}

#[tokio::test]
async fn test_unavailable_store_propagates() {
    let store = MemoryStore::new();
    let a = store.add_user("+910000000001", None);
    store.set_unavailable(true);

    let err = service(&store)
        .create_referral(&a, "+910000000002", 1, Decimal::ONE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
}

/// 枚举从根出发、深度不超过 3 且不回到本路径已有用户的全部路径，返回 (边下标, 深度)
fn reference_paths(root: usize, edges: &[(usize, usize)]) -> Vec<(usize, u8)> {
    fn walk(node: usize, path: &mut Vec<usize>, edges: &[(usize, usize)], out: &mut Vec<(usize, u8)>) {
        let depth = (path.len() - 1) as u8;
        if depth == MAX_REFERRAL_DEPTH {
            return;
        }
        for (index, &(from, to)) in edges.iter().enumerate() {
            if from == node && !path.contains(&to) {
                out.push((index, depth + 1));
                path.push(to);
                walk(to, path, edges, out);
                path.pop();
            }
        }
    }

    let mut out = Vec::new();
    walk(root, &mut vec![root], edges, &mut out);
    out
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}

proptest! {
    #[test]
    fn prop_total_commission_is_order_independent(
        (cents, shuffled) in prop::collection::vec(0i64..1_000_000, 0..40)
            .prop_flat_map(|cents| (Just(cents.clone()), Just(cents).prop_shuffle())),
    ) {
        let to_edges = |values: &[i64]| -> Vec<Referral> {
            values
                .iter()
                .map(|c| Referral::new(ObjectId::new(), ObjectId::new(), 1, Decimal::new(*c, 2)))
                .collect()
        };
        let expected = Decimal::new(cents.iter().sum(), 2);

        prop_assert_eq!(total_commission(&to_edges(&cents)), expected);
        prop_assert_eq!(total_commission(&to_edges(&shuffled)), expected);
    }

    #[test]
    fn prop_tree_matches_path_enumeration(
        n in 2usize..9,
        raw_edges in prop::collection::vec((0usize..9, 0usize..9, 0i64..100_000), 0..30),
    ) {
        let mut seen = HashSet::new();
        let edges: Vec<(usize, usize, i64)> = raw_edges
            .into_iter()
            .map(|(from, to, cents)| (from % n, to % n, cents))
            .filter(|(from, to, _)| from != to && seen.insert((*from, *to)))
            .collect();

        let rt = runtime();
        let store = MemoryStore::new();
        let ids: Vec<ObjectId> = (0..n)
            .map(|i| store.add_user(&format!("+9100000000{:02}", i), None))
            .collect();
        let mut edge_index = HashMap::new();
        for (offset, (from, to, cents)) in edges.iter().enumerate() {
            let mut edge = Referral::new(ids[*from], ids[*to], 1, Decimal::new(*cents, 2));
            edge.created_at = base_time() + Duration::seconds(offset as i64);
            let id = rt.block_on(store.insert_referral(edge)).unwrap();
            edge_index.insert(id, offset);
        }

        let tree = rt.block_on(resolver(&store).resolve(&ids[0])).unwrap();

        let pairs: Vec<(usize, usize)> = edges.iter().map(|(f, t, _)| (*f, *t)).collect();
        let mut expected = reference_paths(0, &pairs);
        let expected_total: Decimal = expected.iter().map(|(i, _)| Decimal::new(edges[*i].2, 2)).sum();
        let mut returned: Vec<(usize, u8)> = tree
            .nodes
            .iter()
            .map(|node| (edge_index[&node.edge.id], node.depth))
            .collect();
        expected.sort_unstable();
        returned.sort_unstable();

        prop_assert_eq!(returned, expected);
        prop_assert_eq!(tree.total_commission, expected_total);
        prop_assert!(tree.nodes.windows(2).all(|w| (w[0].depth, w[0].edge.created_at) <= (w[1].depth, w[1].edge.created_at)));
    }
}
