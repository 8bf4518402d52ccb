use std::{
    collections::HashMap,
    path::{
        Path,
        PathBuf,
    },
    sync::{
        Mutex,
        MutexGuard,
        PoisonError,
    },
};

use chrono::{
    Local,
    NaiveDate,
};

use super::stats;
use crate::{
    core::{
        Category,
        Closet,
        Cloth,
        TansuError,
        BOX_COUNT,
    },
    persistence,
};

/// One keyword-search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ClothMatch {
    pub name: String,
    pub img_path: String,
    /// 1-based box number the item lives in.
    pub box_number: usize,
}

/// File-backed store over the closet document.
///
/// The document is held in memory behind a mutex; every mutation locks,
/// updates the in-memory copy and rewrites the whole file before returning.
/// Concurrent callers therefore serialize instead of racing on the file.
pub struct ClosetStore {
    closet: Mutex<Closet>,
    file_path: PathBuf,
}

impl ClosetStore {
    /// Open an existing closet document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TansuError> {
        let file_path = path.into();
        let closet = persistence::read_closet(&file_path)?;
        Ok(Self { closet: Mutex::new(closet), file_path })
    }

    /// Write a fresh empty closet (7 boxes, positions 1-7) and open it.
    pub fn create(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, TansuError> {
        let file_path = path.into();
        let closet = Closet::new(capacity);
        persistence::write_closet(&file_path, &closet)?;
        Ok(Self { closet: Mutex::new(closet), file_path })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    // A poisoned lock still guards a structurally valid closet: the file is
    // only ever replaced atomically after a completed mutation.
    fn lock(&self) -> MutexGuard<'_, Closet> {
        self.closet.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the full in-memory document.
    pub fn snapshot(&self) -> Closet {
        self.lock().clone()
    }

    /// Register a new item into a box. The item starts unworn with a zero
    /// count, and its image/feature paths are derived from the box number
    /// and name.
    pub fn append_cloth(
        &self,
        box_number: usize,
        category: Category,
        name: &str,
    ) -> Result<(), TansuError> {
        let index = Closet::box_index(box_number)?;
        let mut closet = self.lock();

        if closet.contains_name(name) {
            return Err(TansuError::DuplicateName(name.to_string()));
        }

        let storage_box = &mut closet.boxes[index];
        if storage_box.is_full() {
            return Err(TansuError::BoxFull { box_number, capacity: storage_box.capacity });
        }
        storage_box.clothes_list.push(Cloth::new(box_number, category, name));
        storage_box.recount();

        persistence::write_closet(&self.file_path, &closet)
    }

    /// Remove an item by name, recomputing the owning box's count.
    /// Returns `Ok(false)` if no item had that name.
    pub fn remove_cloth(&self, name: &str) -> Result<bool, TansuError> {
        let mut closet = self.lock();
        let mut removed = false;
        for storage_box in &mut closet.boxes {
            let before = storage_box.clothes_list.len();
            storage_box.clothes_list.retain(|c| c.name != name);
            if storage_box.clothes_list.len() != before {
                storage_box.recount();
                removed = true;
            }
        }
        if removed {
            persistence::write_closet(&self.file_path, &closet)?;
        }
        Ok(removed)
    }

    /// Every item whose name contains `keyword`, in box order then item
    /// order. The empty keyword matches everything.
    pub fn find_by_keyword(&self, keyword: &str) -> Vec<ClothMatch> {
        let closet = self.lock();
        closet
            .iter_cloths()
            .filter(|(_, cloth)| cloth.name.contains(keyword))
            .map(|(box_number, cloth)| ClothMatch {
                name: cloth.name.clone(),
                img_path: cloth.img_path.clone(),
                box_number,
            })
            .collect()
    }

    /// Record that the named item was worn today: bump its count and stamp
    /// the wear date. Returns `Ok(false)` without touching the file if the
    /// name is unknown.
    pub fn record_wear(&self, name: &str) -> Result<bool, TansuError> {
        self.record_wear_on(name, Local::now().date_naive())
    }

    fn record_wear_on(&self, name: &str, today: NaiveDate) -> Result<bool, TansuError> {
        let mut closet = self.lock();
        let found = closet
            .boxes
            .iter_mut()
            .flat_map(|b| b.clothes_list.iter_mut())
            .find(|c| c.name == name);

        match found {
            Some(cloth) => {
                cloth.count += 1;
                cloth.last_wear_date = Some(today);
            }
            None => {
                log::warn!("record_wear: no cloth named '{}'", name);
                return Ok(false);
            }
        }

        persistence::write_closet(&self.file_path, &closet)?;
        Ok(true)
    }

    pub fn is_box_full(&self, box_number: usize) -> Result<bool, TansuError> {
        let index = Closet::box_index(box_number)?;
        Ok(self.lock().boxes[index].is_full())
    }

    /// Overwrite every box's designated categories. The fixed-size array
    /// keeps the one-entry-per-box contract visible in the signature.
    pub fn set_box_categories(
        &self,
        categories: [Vec<Category>; BOX_COUNT],
    ) -> Result<(), TansuError> {
        let mut closet = self.lock();
        for (storage_box, designated) in closet.boxes.iter_mut().zip(categories) {
            storage_box.category_to_save = designated;
        }
        persistence::write_closet(&self.file_path, &closet)
    }

    /// Position of the first box designated to hold `category`, if any.
    pub fn resolve_box_by_category(&self, category: Category) -> Option<u32> {
        let closet = self.lock();
        closet
            .boxes
            .iter()
            .find(|b| b.category_to_save.contains(&category))
            .map(|b| b.position)
    }

    /// Wear counts per category for the current Monday-Sunday week.
    pub fn weekly_wear_counts_by_category(&self) -> HashMap<Category, u32> {
        stats::wear_counts_by_category(&self.lock(), Local::now().date_naive())
    }

    /// Wear counts per item name for the current Monday-Sunday week.
    pub fn weekly_wear_counts_by_name(&self) -> HashMap<String, u32> {
        stats::wear_counts_by_name(&self.lock(), Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn new_store(capacity: usize) -> (TempDir, ClosetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ClosetStore::create(dir.path().join("clothes.json"), capacity).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ClosetStore::open(dir.path().join("clothes.json")).is_err());
    }

    #[test]
    fn test_append_then_reload() {
        let (_dir, store) = new_store(5);
        store.append_cloth(3, Category::Pants, "black_jeans").unwrap();

        // Reopen from disk to check what was actually persisted.
        let reopened = ClosetStore::open(store.file_path()).unwrap();
        let closet = reopened.snapshot();
        let storage_box = &closet.boxes[2];
        assert_eq!(storage_box.used, 1);
        assert_eq!(storage_box.used, storage_box.clothes_list.len());

        let cloth = &storage_box.clothes_list[0];
        assert_eq!(cloth.name, "black_jeans");
        assert_eq!(cloth.count, 0);
        assert!(cloth.never_worn());
        assert_eq!(cloth.img_path, "images/box/box3/black_jeans.jpg");
    }

    #[test]
    fn test_append_validates_box_number() {
        let (_dir, store) = new_store(5);
        assert!(matches!(
            store.append_cloth(0, Category::Coat, "x"),
            Err(TansuError::BoxOutOfRange(0))
        ));
        assert!(matches!(
            store.append_cloth(8, Category::Coat, "x"),
            Err(TansuError::BoxOutOfRange(8))
        ));
    }

    #[test]
    fn test_append_rejects_duplicate_name() {
        let (_dir, store) = new_store(5);
        store.append_cloth(1, Category::Coat, "wool_coat").unwrap();
        // Same name in a different box still counts as a duplicate.
        assert!(matches!(
            store.append_cloth(2, Category::Padding, "wool_coat"),
            Err(TansuError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let (_dir, store) = new_store(2);
        assert!(!store.is_box_full(1).unwrap());

        store.append_cloth(1, Category::Shirt, "shirt_a").unwrap();
        assert!(!store.is_box_full(1).unwrap());

        store.append_cloth(1, Category::Shirt, "shirt_b").unwrap();
        assert!(store.is_box_full(1).unwrap());

        assert!(matches!(
            store.append_cloth(1, Category::Shirt, "shirt_c"),
            Err(TansuError::BoxFull { box_number: 1, capacity: 2 })
        ));
    }

    #[test]
    fn test_find_by_keyword() {
        let (_dir, store) = new_store(5);
        store.append_cloth(1, Category::Coat, "wool_coat").unwrap();
        store.append_cloth(2, Category::Pants, "black_jeans").unwrap();
        store.append_cloth(2, Category::Pants, "blue_jeans").unwrap();

        let hits = store.find_by_keyword("jeans");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "black_jeans");
        assert_eq!(hits[0].box_number, 2);
        assert_eq!(hits[1].name, "blue_jeans");

        // Empty keyword matches everything, box order first.
        let all = store.find_by_keyword("");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "wool_coat");

        assert!(store.find_by_keyword("sneaker").is_empty());
    }

    #[test]
    fn test_record_wear_updates_count_and_date() {
        let (_dir, store) = new_store(5);
        store.append_cloth(4, Category::Dress, "summer_dress").unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert!(store.record_wear_on("summer_dress", today).unwrap());
        assert!(store.record_wear_on("summer_dress", today).unwrap());

        let closet = ClosetStore::open(store.file_path()).unwrap().snapshot();
        let cloth = &closet.boxes[3].clothes_list[0];
        assert_eq!(cloth.count, 2);
        assert_eq!(cloth.last_wear_date, Some(today));
    }

    #[test]
    fn test_record_wear_unknown_name_leaves_document_untouched() {
        let (_dir, store) = new_store(5);
        store.append_cloth(1, Category::Coat, "wool_coat").unwrap();
        let before = fs::read_to_string(store.file_path()).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert!(!store.record_wear_on("parka", today).unwrap());

        let after = fs::read_to_string(store.file_path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_cloth() {
        let (_dir, store) = new_store(5);
        store.append_cloth(1, Category::Coat, "wool_coat").unwrap();
        store.append_cloth(1, Category::Padding, "down_jacket").unwrap();

        assert!(store.remove_cloth("wool_coat").unwrap());
        assert!(!store.remove_cloth("wool_coat").unwrap());

        let closet = ClosetStore::open(store.file_path()).unwrap().snapshot();
        assert_eq!(closet.boxes[0].used, 1);
        assert_eq!(closet.boxes[0].clothes_list[0].name, "down_jacket");
    }

    #[test]
    fn test_set_and_resolve_box_categories() {
        let (_dir, store) = new_store(5);
        let mut categories: [Vec<Category>; BOX_COUNT] = Default::default();
        categories[0] = vec![Category::Coat, Category::Padding];
        categories[5] = vec![Category::Pants];
        store.set_box_categories(categories).unwrap();

        assert_eq!(store.resolve_box_by_category(Category::Padding), Some(1));
        assert_eq!(store.resolve_box_by_category(Category::Pants), Some(6));
        assert_eq!(store.resolve_box_by_category(Category::Dress), None);

        // Assignments survive a reload.
        let reopened = ClosetStore::open(store.file_path()).unwrap();
        assert_eq!(reopened.resolve_box_by_category(Category::Coat), Some(1));
    }

    #[test]
    fn test_weekly_counts_through_store() {
        let (_dir, store) = new_store(5);
        store.append_cloth(6, Category::Pants, "black_jeans").unwrap();
        store.record_wear("black_jeans").unwrap();

        // Worn today, so it lands inside the current week by definition.
        let by_category = store.weekly_wear_counts_by_category();
        assert_eq!(by_category.get(&Category::Pants), Some(&1));

        let by_name = store.weekly_wear_counts_by_name();
        assert_eq!(by_name.get("black_jeans"), Some(&1));
    }
}
