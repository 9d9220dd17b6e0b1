use serde_json::Value;

use akeno_client::{HttpClient, Result, UserField};

use crate::cache::{project, Cache, CacheKey};
use crate::tweet::Tweet;
use crate::user::User;

/// Composition root: one credential, one gateway, one response cache.
///
/// Read methods come in three flavors per resource: `fetch_*` always
/// asks the API and overwrites the cache, `get_*` only reads the cache,
/// and `getch_*` reads through — cached entry when present, one fetch
/// otherwise. Mutation methods are never cached.
pub struct AkenoClient {
    user_id: u64,
    http: HttpClient,
    cache: Cache,
}

impl AkenoClient {
    /// Build a client for the given bearer token, acting as `user_id`
    /// in like and retweet calls.
    pub fn new(token: &str, user_id: u64) -> Result<AkenoClient> {
        Ok(AkenoClient::with_http(HttpClient::new(token)?, user_id))
    }

    /// Build a client over an existing gateway.
    pub fn with_http(http: HttpClient, user_id: u64) -> AkenoClient {
        AkenoClient {
            user_id,
            http,
            cache: Cache::new(),
        }
    }

    /// The response cache, for inspection.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    // MARK: Tweets

    /// Fetch a tweet from the API, overwriting any cached entry.
    pub async fn fetch_tweet(&self, tweet_id: u64) -> Result<Tweet> {
        let response = self.http.tweet(tweet_id).await?;
        self.cache.save(CacheKey::Tweet(tweet_id), response.clone());
        tracing::debug!("cached tweet {}", tweet_id);
        Ok(Tweet::new(tweet_id, response))
    }

    /// Read a tweet from the cache; `None` when it was never fetched.
    pub fn get_tweet(&self, tweet_id: u64) -> Option<Tweet> {
        let cached = self.cache.get(&CacheKey::Tweet(tweet_id))?;
        Some(Tweet::new(tweet_id, cached))
    }

    /// Serve a tweet from the cache, fetching it on a miss.
    pub async fn getch_tweet(&self, tweet_id: u64) -> Result<Tweet> {
        match self.get_tweet(tweet_id) {
            Some(tweet) => Ok(tweet),
            None => self.fetch_tweet(tweet_id).await,
        }
    }

    /// Fetch several tweets in one call, overwriting the batch entry.
    pub async fn fetch_tweets(&self, tweet_ids: &[u64]) -> Result<Value> {
        let response = self.http.tweets(tweet_ids).await?;
        self.cache.save(CacheKey::Tweets(tweet_ids.to_vec()), response.clone());
        tracing::debug!("cached batch of {} tweets", tweet_ids.len());
        Ok(response)
    }

    /// Read a batch lookup from the cache, keyed by the exact id list.
    pub fn get_tweets(&self, tweet_ids: &[u64]) -> Option<Value> {
        self.cache.get(&CacheKey::Tweets(tweet_ids.to_vec()))
    }

    /// Serve a batch lookup from the cache, fetching it on a miss.
    pub async fn getch_tweets(&self, tweet_ids: &[u64]) -> Result<Value> {
        match self.get_tweets(tweet_ids) {
            Some(cached) => Ok(cached),
            None => self.fetch_tweets(tweet_ids).await,
        }
    }

    // MARK: Users

    /// Fetch a user from the API, overwriting any cached entry.
    pub async fn fetch_user(&self, user_id: u64) -> Result<User> {
        let response = self.http.user(user_id).await?;
        self.cache.save(CacheKey::User(user_id), response.clone());
        tracing::debug!("cached user {}", user_id);
        Ok(User::new(user_id, response))
    }

    /// Read a user from the cache; `None` when it was never fetched.
    pub fn get_user(&self, user_id: u64) -> Option<User> {
        let cached = self.cache.get(&CacheKey::User(user_id))?;
        Some(User::new(user_id, cached))
    }

    /// Serve a user from the cache, fetching it on a miss.
    pub async fn getch_user(&self, user_id: u64) -> Result<User> {
        match self.get_user(user_id) {
            Some(user) => Ok(user),
            None => self.fetch_user(user_id).await,
        }
    }

    // MARK: User fields

    /// Fetch a single user field, overwriting the user's cache entry
    /// with the field-selected response.
    pub async fn fetch_user_field(&self, user_id: u64, field: UserField) -> Result<Option<Value>> {
        let response = self.http.user_field(user_id, field).await?;
        self.cache.save(CacheKey::User(user_id), response.clone());
        Ok(project(&response, &field.path()).cloned())
    }

    /// Read a single user field from the cache; `None` when the user
    /// was never fetched or the entry does not carry the field.
    pub fn get_user_field(&self, user_id: u64, field: UserField) -> Option<Value> {
        self.cache.get_path(&CacheKey::User(user_id), &field.path())
    }

    /// Serve a user field from the cache, fetching on a miss. `None`
    /// when the fetched response does not carry the field either.
    pub async fn getch_user_field(&self, user_id: u64, field: UserField) -> Result<Option<Value>> {
        match self.get_user_field(user_id, field) {
            Some(value) => Ok(Some(value)),
            None => self.fetch_user_field(user_id, field).await,
        }
    }

    // MARK: Actions

    /// Post a tweet with the given text.
    pub async fn post_tweet(&self, text: &str) -> Result<Value> {
        self.http.post_tweet(text).await
    }

    /// Delete one of the acting user's tweets.
    pub async fn delete_tweet(&self, tweet_id: u64) -> Result<Value> {
        self.http.delete_tweet(tweet_id).await
    }

    /// Like a tweet as the acting user.
    pub async fn like_tweet(&self, tweet_id: u64) -> Result<Value> {
        self.http.like_tweet(self.user_id, tweet_id).await
    }

    /// Remove the acting user's like from a tweet.
    pub async fn unlike_tweet(&self, tweet_id: u64) -> Result<Value> {
        self.http.unlike_tweet(self.user_id, tweet_id).await
    }

    /// Retweet a tweet as the acting user.
    pub async fn retweet(&self, tweet_id: u64) -> Result<Value> {
        self.http.retweet(self.user_id, tweet_id).await
    }
}
