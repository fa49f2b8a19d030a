//! 推荐树解析
//!
//! 从根用户出发按层(BFS)展开推荐关系，最多 [`MAX_REFERRAL_DEPTH`] 层。
//! 返回所有可达路径上的边：同一用户经不同路径到达会出现多次，各自计佣。
//! 只拒绝回到当前路径上已有的用户，所以环路一定终止，且同一路径上不会重复计佣。

use database::{
    referral::{model::Referral, repository::DynReferralRepository},
    user::{model::User, repository::DynUserRepository},
};
use futures::future::try_join_all;
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};
use utils::{AppError, AppResult};

pub const MAX_REFERRAL_DEPTH: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ReferralNode {
    pub edge: Referral,
    pub referred_phone: String,
    pub referred_name: Option<String>,
    /// 该路径上距根的跳数，1..=MAX_REFERRAL_DEPTH
    pub depth: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferralTree {
    /// 按 depth 升序，同层按 created_at 升序
    pub nodes: Vec<ReferralNode>,
    pub total_commission: Decimal,
}

/// 精确十进制求和
pub fn total_commission<'a>(edges: impl IntoIterator<Item = &'a Referral>) -> Decimal {
    edges.into_iter().map(|edge| edge.commission).sum()
}

#[derive(Clone)]
pub struct ReferralTreeResolver {
    users: DynUserRepository,
    referrals: DynReferralRepository,
}

impl ReferralTreeResolver {
    pub fn new(users: DynUserRepository, referrals: DynReferralRepository) -> Self {
        Self { users, referrals }
    }

    pub async fn resolve(&self, root_id: &ObjectId) -> AppResult<ReferralTree> {
        if !self.users.exists(root_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", root_id)));
        }

        // 每个前沿条目携带从根到自身的路径(含根)
        let mut frontier: Vec<(ObjectId, Vec<ObjectId>)> = vec![(*root_id, vec![*root_id])];
        let mut edges_by_user: HashMap<ObjectId, Vec<Referral>> = HashMap::new();
        let mut referred_users: HashMap<ObjectId, Option<User>> = HashMap::new();
        let mut nodes = Vec::new();

        for depth in 1..=MAX_REFERRAL_DEPTH {
            if frontier.is_empty() {
                break;
            }

            // 同一用户经多条路径到达时只查询一次出边
            let mut pending = Vec::new();
            for (id, _) in &frontier {
                if !edges_by_user.contains_key(id) && !pending.contains(id) {
                    pending.push(*id);
                }
            }
            let batches = try_join_all(pending.iter().map(|id| self.referrals.edges_from(id))).await?;
            edges_by_user.extend(pending.into_iter().zip(batches));

            let known_edges = &edges_by_user;
            let mut candidates: Vec<(Referral, &Vec<ObjectId>)> = frontier
                .iter()
                .flat_map(move |(id, path)| {
                    known_edges
                        .get(id)
                        .into_iter()
                        .flatten()
                        .map(move |edge| (edge.clone(), path))
                })
                .collect();
            candidates.sort_by_key(|(edge, _)| edge.created_at);

            let mut next_frontier = Vec::new();
            for (edge, path) in candidates {
                if path.contains(&edge.referred_id) {
                    debug!("🔁 跳过路径上已出现的用户 {} (depth {})", edge.referred_id, depth);
                    continue;
                }

                let referred = match referred_users.get(&edge.referred_id) {
                    Some(user) => user.clone(),
                    None => {
                        let user = self.users.get_user_by_id(&edge.referred_id).await?;
                        referred_users.insert(edge.referred_id, user.clone());
                        user
                    }
                };
                let Some(referred) = referred else {
                    warn!("⚠️ 推荐关系 {} 指向不存在的用户 {}", edge.id, edge.referred_id);
                    continue;
                };

                let mut next_path = path.clone();
                next_path.push(edge.referred_id);
                next_frontier.push((edge.referred_id, next_path));
                nodes.push(ReferralNode {
                    referred_phone: referred.phone,
                    referred_name: referred.name,
                    depth,
                    edge,
                });
            }

            frontier = next_frontier;
        }

        let total_commission = total_commission(nodes.iter().map(|node| &node.edge));
        debug!("🌳 推荐树 {}: {} 条边, 佣金合计 {}", root_id, nodes.len(), total_commission);

        Ok(ReferralTree { nodes, total_commission })
    }
}
