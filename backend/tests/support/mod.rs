//! In-memory port implementations backing the HTTP flow tests.
//!
//! The stubs model the storage contracts the MySQL adapters rely on (unique
//! pair constraints, insert-or-ignore, insertion-order surrogate keys) so
//! the handler flows can be exercised end-to-end without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use async_trait::async_trait;

use tabemap_backend::domain::ports::{
    CredentialRecord, FavoritesRepository, FavoritesRepositoryError, FollowRepository,
    FollowRepositoryError, FriendshipRepository, FriendshipRepositoryError, NewAccount,
    PasswordHashError, PasswordHasher, ShopCatalogue, ShopCatalogueError, UserAccountRepository,
    UserAccountRepositoryError, UserIconRepository, UserIconRepositoryError, UserIdSampler,
};
use tabemap_backend::domain::{
    AccountService, DisplayName, EmailAddress, FriendPair, Shop, ShopId, ShopSearchCriteria,
    ShopSearchHit, SocialProfile, UserId, UserSummary,
};
use tabemap_backend::inbound::http::state::HttpState;

/// Cookie-session middleware for tests: generated key, plain-HTTP cookies.
pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_secure(false)
        .build()
}

#[derive(Debug, Clone)]
struct AccountRow {
    user_name: String,
    email: String,
    password_hash: String,
    profile_photo_id: Option<i32>,
}

/// Shared in-memory tables.
#[derive(Default)]
pub struct SharedStores {
    accounts: Mutex<HashMap<i32, AccountRow>>,
    favorites: Mutex<Vec<(i32, i32, i64)>>,
    friendships: Mutex<Vec<(i32, i32)>>,
    follows: Mutex<Vec<(i32, i32)>>,
    shops: Mutex<Vec<Shop>>,
    next_surrogate: AtomicI64,
}

impl SharedStores {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed the read-only catalogue.
    pub fn seed_shops(self: &Arc<Self>, shops: Vec<Shop>) {
        *self.shops.lock().expect("shops lock") = shops;
    }

    /// Snapshot of the user's favorite shop ids, newest first.
    pub fn favorite_ids(&self, user_id: i32) -> Vec<i32> {
        let mut rows: Vec<(i32, i64)> = self
            .favorites
            .lock()
            .expect("favorites lock")
            .iter()
            .filter(|(user, _, _)| *user == user_id)
            .map(|(_, shop, key)| (*shop, *key))
            .collect();
        rows.sort_by_key(|(_, key)| std::cmp::Reverse(*key));
        rows.into_iter().map(|(shop, _)| shop).collect()
    }
}

/// Construct a shop row for seeding.
pub fn shop(shop_id: i32, genre: &str, budget: i32, distance: i32) -> Shop {
    Shop {
        shop_id: ShopId::new(shop_id),
        shop_name: format!("shop-{shop_id}"),
        genre: genre.to_owned(),
        budget,
        distance,
        photo_address: String::new(),
        address: String::new(),
        google_map_link: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Port implementations
// ---------------------------------------------------------------------------

pub struct StubFavorites(pub Arc<SharedStores>);

#[async_trait]
impl FavoritesRepository for StubFavorites {
    async fn sync_favorites(
        &self,
        user_id: UserId,
        shop_ids: &[ShopId],
    ) -> Result<(), FavoritesRepositoryError> {
        let mut rows = self.0.favorites.lock().expect("favorites lock");
        rows.retain(|(user, _, _)| *user != user_id.get());
        for shop_id in shop_ids {
            let key = self.0.next_surrogate.fetch_add(1, Ordering::SeqCst);
            rows.push((user_id.get(), shop_id.get(), key));
        }
        Ok(())
    }

    async fn update_diff(
        &self,
        user_id: UserId,
        added: &[ShopId],
        removed: &[ShopId],
    ) -> Result<(), FavoritesRepositoryError> {
        let mut rows = self.0.favorites.lock().expect("favorites lock");
        // Mirror the adapter: delete first, then insert-or-ignore.
        rows.retain(|(user, shop, _)| {
            *user != user_id.get() || !removed.iter().any(|removed| removed.get() == *shop)
        });
        for shop_id in added {
            let exists = rows
                .iter()
                .any(|(user, shop, _)| *user == user_id.get() && *shop == shop_id.get());
            if !exists {
                let key = self.0.next_surrogate.fetch_add(1, Ordering::SeqCst);
                rows.push((user_id.get(), shop_id.get(), key));
            }
        }
        Ok(())
    }

    async fn favorites_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Shop>, FavoritesRepositoryError> {
        let shops = self.0.shops.lock().expect("shops lock").clone();
        Ok(self
            .0
            .favorite_ids(user_id.get())
            .into_iter()
            .filter_map(|shop_id| {
                shops
                    .iter()
                    .find(|shop| shop.shop_id.get() == shop_id)
                    .cloned()
            })
            .collect())
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        shop_id: ShopId,
    ) -> Result<(), FavoritesRepositoryError> {
        let mut rows = self.0.favorites.lock().expect("favorites lock");
        rows.retain(|(user, shop, _)| *user != user_id.get() || *shop != shop_id.get());
        Ok(())
    }
}

pub struct StubFriendships(pub Arc<SharedStores>);

#[async_trait]
impl FriendshipRepository for StubFriendships {
    async fn create_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<(), FriendshipRepositoryError> {
        let pair =
            FriendPair::new(a, b).map_err(|_| FriendshipRepositoryError::self_friendship())?;
        let mut rows = self.0.friendships.lock().expect("friendships lock");
        let key = (pair.small().get(), pair.large().get());
        if rows.contains(&key) {
            return Err(FriendshipRepositoryError::already_friends());
        }
        rows.push(key);
        Ok(())
    }

    async fn delete_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<(), FriendshipRepositoryError> {
        let pair =
            FriendPair::new(a, b).map_err(|_| FriendshipRepositoryError::self_friendship())?;
        let mut rows = self.0.friendships.lock().expect("friendships lock");
        rows.retain(|key| *key != (pair.small().get(), pair.large().get()));
        Ok(())
    }

    async fn friendship_exists(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<bool, FriendshipRepositoryError> {
        let Ok(pair) = FriendPair::new(a, b) else {
            return Ok(false);
        };
        let rows = self.0.friendships.lock().expect("friendships lock");
        Ok(rows.contains(&(pair.small().get(), pair.large().get())))
    }

    async fn friends_of(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserId>, FriendshipRepositoryError> {
        let rows = self.0.friendships.lock().expect("friendships lock");
        Ok(rows
            .iter()
            .filter_map(|(small, large)| {
                let other = if *small == user_id.get() {
                    *large
                } else if *large == user_id.get() {
                    *small
                } else {
                    return None;
                };
                UserId::new(other).ok()
            })
            .collect())
    }
}

pub struct StubFollows(pub Arc<SharedStores>);

impl StubFollows {
    fn profile_of(&self, user_id: i32) -> Option<SocialProfile> {
        let accounts = self.0.accounts.lock().expect("accounts lock");
        let row = accounts.get(&user_id)?;
        Some(SocialProfile {
            user_id: UserId::new(user_id).ok()?,
            user_name: row.user_name.clone(),
            photo_address: None,
        })
    }
}

#[async_trait]
impl FollowRepository for StubFollows {
    async fn follow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<(), FollowRepositoryError> {
        if follower == followed {
            return Err(FollowRepositoryError::self_follow());
        }
        let mut rows = self.0.follows.lock().expect("follows lock");
        let key = (follower.get(), followed.get());
        if rows.contains(&key) {
            return Err(FollowRepositoryError::already_following());
        }
        rows.push(key);
        Ok(())
    }

    async fn unfollow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<(), FollowRepositoryError> {
        if follower == followed {
            return Err(FollowRepositoryError::self_follow());
        }
        let mut rows = self.0.follows.lock().expect("follows lock");
        rows.retain(|key| *key != (follower.get(), followed.get()));
        Ok(())
    }

    async fn followed_by(
        &self,
        follower: UserId,
    ) -> Result<Vec<SocialProfile>, FollowRepositoryError> {
        let keys: Vec<i32> = {
            let rows = self.0.follows.lock().expect("follows lock");
            rows.iter()
                .filter(|(from, _)| *from == follower.get())
                .map(|(_, to)| *to)
                .collect()
        };
        Ok(keys.into_iter().filter_map(|id| self.profile_of(id)).collect())
    }

    async fn followers_of(
        &self,
        followed: UserId,
    ) -> Result<Vec<SocialProfile>, FollowRepositoryError> {
        let keys: Vec<i32> = {
            let rows = self.0.follows.lock().expect("follows lock");
            rows.iter()
                .filter(|(_, to)| *to == followed.get())
                .map(|(from, _)| *from)
                .collect()
        };
        Ok(keys.into_iter().filter_map(|id| self.profile_of(id)).collect())
    }

    async fn is_following(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, FollowRepositoryError> {
        if follower == followed {
            return Ok(false);
        }
        let rows = self.0.follows.lock().expect("follows lock");
        Ok(rows.contains(&(follower.get(), followed.get())))
    }
}

pub struct StubAccounts(pub Arc<SharedStores>);

#[async_trait]
impl UserAccountRepository for StubAccounts {
    async fn find_credentials(
        &self,
        login_id: &str,
    ) -> Result<Option<CredentialRecord>, UserAccountRepositoryError> {
        let accounts = self.0.accounts.lock().expect("accounts lock");
        let numeric: Option<i32> = login_id.parse().ok();
        let found = accounts.iter().find(|(user_id, row)| {
            row.email == login_id || Some(**user_id) == numeric
        });
        Ok(found.and_then(|(user_id, row)| {
            UserId::new(*user_id).ok().map(|user_id| CredentialRecord {
                summary: UserSummary {
                    user_id,
                    user_name: row.user_name.clone(),
                    email: row.email.clone(),
                    profile_photo_id: row.profile_photo_id,
                },
                password_hash: row.password_hash.clone(),
            })
        }))
    }

    async fn insert_account(
        &self,
        account: &NewAccount,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut accounts = self.0.accounts.lock().expect("accounts lock");
        if accounts
            .values()
            .any(|row| row.email == account.email.as_ref())
        {
            return Err(UserAccountRepositoryError::duplicate_email());
        }
        if accounts.contains_key(&account.user_id.get()) {
            return Err(UserAccountRepositoryError::duplicate_user_id());
        }
        accounts.insert(
            account.user_id.get(),
            AccountRow {
                user_name: account.user_name.as_ref().to_owned(),
                email: account.email.as_ref().to_owned(),
                password_hash: account.password_hash.clone(),
                profile_photo_id: None,
            },
        );
        Ok(())
    }

    async fn user_id_exists(&self, user_id: UserId) -> Result<bool, UserAccountRepositoryError> {
        let accounts = self.0.accounts.lock().expect("accounts lock");
        Ok(accounts.contains_key(&user_id.get()))
    }

    async fn is_email_taken(&self, email: &str) -> Result<bool, UserAccountRepositoryError> {
        let accounts = self.0.accounts.lock().expect("accounts lock");
        Ok(accounts.values().any(|row| row.email == email))
    }

    async fn find_by_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSummary>, UserAccountRepositoryError> {
        let accounts = self.0.accounts.lock().expect("accounts lock");
        Ok(accounts.get(&user_id.get()).map(|row| UserSummary {
            user_id,
            user_name: row.user_name.clone(),
            email: row.email.clone(),
            profile_photo_id: row.profile_photo_id,
        }))
    }

    async fn password_hash(
        &self,
        user_id: UserId,
    ) -> Result<Option<String>, UserAccountRepositoryError> {
        let accounts = self.0.accounts.lock().expect("accounts lock");
        Ok(accounts
            .get(&user_id.get())
            .map(|row| row.password_hash.clone()))
    }

    async fn update_username(
        &self,
        user_id: UserId,
        user_name: &DisplayName,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut accounts = self.0.accounts.lock().expect("accounts lock");
        if let Some(row) = accounts.get_mut(&user_id.get()) {
            row.user_name = user_name.as_ref().to_owned();
        }
        Ok(())
    }

    async fn update_email(
        &self,
        user_id: UserId,
        email: &EmailAddress,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut accounts = self.0.accounts.lock().expect("accounts lock");
        if accounts
            .iter()
            .any(|(id, row)| *id != user_id.get() && row.email == email.as_ref())
        {
            return Err(UserAccountRepositoryError::duplicate_email());
        }
        if let Some(row) = accounts.get_mut(&user_id.get()) {
            row.email = email.as_ref().to_owned();
        }
        Ok(())
    }

    async fn update_profile_photo(
        &self,
        user_id: UserId,
        profile_photo_id: Option<i32>,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut accounts = self.0.accounts.lock().expect("accounts lock");
        if let Some(row) = accounts.get_mut(&user_id.get()) {
            row.profile_photo_id = profile_photo_id;
        }
        Ok(())
    }

    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut accounts = self.0.accounts.lock().expect("accounts lock");
        if let Some(row) = accounts.get_mut(&user_id.get()) {
            row.password_hash = password_hash.to_owned();
        }
        Ok(())
    }

    async fn search_users(
        &self,
        keyword: &str,
    ) -> Result<Vec<UserSummary>, UserAccountRepositoryError> {
        let accounts = self.0.accounts.lock().expect("accounts lock");
        Ok(accounts
            .iter()
            .filter(|(_, row)| row.user_name.contains(keyword) || row.email.contains(keyword))
            .filter_map(|(user_id, row)| {
                UserId::new(*user_id).ok().map(|user_id| UserSummary {
                    user_id,
                    user_name: row.user_name.clone(),
                    email: row.email.clone(),
                    profile_photo_id: row.profile_photo_id,
                })
            })
            .collect())
    }
}

/// Catalogue stub honouring the criteria contract against seeded shops.
pub struct StubCatalogue(pub Arc<SharedStores>);

#[async_trait]
impl ShopCatalogue for StubCatalogue {
    async fn search(
        &self,
        criteria: &ShopSearchCriteria,
    ) -> Result<Vec<ShopSearchHit>, ShopCatalogueError> {
        let shops = self.0.shops.lock().expect("shops lock").clone();
        let favorite_ids: Vec<i32> = criteria
            .favorites_of()
            .map(|user_id| self.0.favorite_ids(user_id.get()))
            .unwrap_or_default();

        Ok(shops
            .into_iter()
            .filter(|candidate| {
                criteria
                    .budget_ceiling()
                    .is_none_or(|ceiling| candidate.budget <= ceiling)
            })
            .filter(|candidate| {
                criteria
                    .distance()
                    .is_none_or(|band| candidate.distance <= band.max_metres())
            })
            .filter(|candidate| {
                criteria.genres().is_empty()
                    || criteria.genres().contains(&candidate.genre)
            })
            .map(|candidate| {
                let is_favorite = favorite_ids.contains(&candidate.shop_id.get());
                ShopSearchHit {
                    shop: candidate,
                    is_favorite,
                }
            })
            .collect())
    }
}

pub struct StubIcons;

#[async_trait]
impl UserIconRepository for StubIcons {
    async fn icon_address(
        &self,
        _profile_photo_id: i32,
    ) -> Result<Option<String>, UserIconRepositoryError> {
        Ok(None)
    }
}

/// Transparent "hash" for tests; never use outside test support.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, plain: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain::{plain}"))
    }

    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(hash == format!("plain::{plain}"))
    }
}

/// Sampler yielding a fixed sequence of candidate ids.
pub struct SeqSampler(pub Mutex<Vec<i32>>);

impl SeqSampler {
    pub fn new(candidates: Vec<i32>) -> Self {
        Self(Mutex::new(candidates))
    }
}

impl UserIdSampler for SeqSampler {
    fn sample(&self) -> i32 {
        self.0
            .lock()
            .expect("sampler lock")
            .pop()
            .unwrap_or(99_999_999)
    }
}

/// Build an HTTP state over the shared in-memory stores.
pub fn http_state(stores: &Arc<SharedStores>, candidate_ids: Vec<i32>) -> HttpState {
    let accounts = AccountService::new(
        Arc::new(StubAccounts(Arc::clone(stores))),
        Arc::new(PlainHasher),
        Arc::new(SeqSampler::new(candidate_ids)),
    );
    HttpState {
        accounts: Arc::new(accounts),
        favorites: Arc::new(StubFavorites(Arc::clone(stores))),
        friendships: Arc::new(StubFriendships(Arc::clone(stores))),
        follows: Arc::new(StubFollows(Arc::clone(stores))),
        shops: Arc::new(StubCatalogue(Arc::clone(stores))),
        icons: Arc::new(StubIcons),
    }
}
