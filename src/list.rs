extern crate alloc;

use alloc::boxed::Box;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};

/// A node in the doubly linked list.
///
/// Contains a value and pointers to the previous and next entries.
/// This structure is not meant to be used directly by users of the `List`.
pub struct Entry<T> {
    /// The value stored in this entry. Uses MaybeUninit to allow for sigil nodes.
    val: mem::MaybeUninit<T>,
    /// Pointer to the previous entry in the list.
    prev: *mut Entry<T>,
    /// Pointer to the next entry in the list.
    next: *mut Entry<T>,
}

impl<T> Entry<T> {
    fn new(val: T) -> Self {
        Entry {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Creates a new sigil (sentinel) entry without initializing the value.
    ///
    /// Sigil entries are used as head and tail markers in the list.
    fn new_sigil() -> Self {
        Entry {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns a reference to the value stored in this entry.
    ///
    /// # Safety
    ///
    /// The value must be initialized, i.e. this must not be a sigil node.
    pub unsafe fn get_value(&self) -> &T {
        // SAFETY: caller guarantees this is a non-sigil node
        unsafe { self.val.assume_init_ref() }
    }
}

/// An unbounded doubly linked list with O(1) operations at both ends.
///
/// The list owns its nodes and hands out raw node pointers so that an external
/// index can reach any node in constant time. Head and tail sentinels (sigils)
/// remove the empty-list special cases from linking code.
///
/// Front is the node right after the head sentinel, back is the node right
/// before the tail sentinel.
pub struct List<T> {
    /// Current number of items in the list.
    len: usize,
    /// Pointer to the head sentinel node.
    head: *mut Entry<T>,
    /// Pointer to the tail sentinel node.
    tail: *mut Entry<T>,
    _marker: PhantomData<Box<Entry<T>>>,
}

impl<T> List<T> {
    /// Creates a new, empty list.
    pub fn new() -> List<T> {
        let head = Box::into_raw(Box::new(Entry::new_sigil()));
        let tail = Box::into_raw(Box::new(Entry::new_sigil()));

        // SAFETY: head and tail are newly allocated and valid pointers
        unsafe {
            (*head).next = tail;
            (*tail).prev = head;
        }

        List {
            len: 0,
            head,
            tail,
            _marker: PhantomData,
        }
    }

    /// Returns the current number of items in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn alloc(v: T) -> *mut Entry<T> {
        // SAFETY: Box::into_raw never returns null
        unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Entry::new(v)))) }.as_ptr()
    }

    /// Adds a value to the front of the list and returns its node.
    pub fn push_front(&mut self, v: T) -> *mut Entry<T> {
        let node = Self::alloc(v);
        // SAFETY: node is a newly allocated entry that is not part of any list yet
        unsafe { self.attach_front(node) };
        self.len += 1;
        node
    }

    /// Adds a value to the back of the list and returns its node.
    pub fn push_back(&mut self, v: T) -> *mut Entry<T> {
        let node = Self::alloc(v);
        // SAFETY: node is a newly allocated entry that is not part of any list yet
        unsafe { self.attach_back(node) };
        self.len += 1;
        node
    }

    /// Removes the front item and returns its value.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so head.next is a value node
        unsafe {
            let node = (*self.head).next;
            Some(self.remove(node))
        }
    }

    /// Removes the back item and returns its value.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so tail.prev is a value node
        unsafe {
            let node = (*self.tail).prev;
            Some(self.remove(node))
        }
    }

    /// Returns a reference to the front value.
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so head.next is an initialized value node
        unsafe { Some((*(*self.head).next).get_value()) }
    }

    /// Returns a reference to the back value.
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so tail.prev is an initialized value node
        unsafe { Some((*(*self.tail).prev).get_value()) }
    }

    /// Unlinks `node`, frees it and returns its value.
    ///
    /// # Safety
    ///
    /// `node` must be a live value node of this list (not a sentinel, not
    /// previously removed).
    pub unsafe fn remove(&mut self, node: *mut Entry<T>) -> T {
        // SAFETY: caller guarantees node is a value node of this list
        unsafe {
            self.detach(node);
            self.len -= 1;
            let entry = *Box::from_raw(node);
            entry.val.assume_init()
        }
    }

    /// Moves a node to the front of the list.
    ///
    /// # Safety
    ///
    /// `node` must be a live value node of this list.
    pub unsafe fn move_to_front(&mut self, node: *mut Entry<T>) {
        // SAFETY: caller guarantees node is a value node of this list
        unsafe {
            if (*self.head).next == node {
                return;
            }
            self.detach(node);
            self.attach_front(node);
        }
    }

    /// Moves a node to the back of the list.
    ///
    /// # Safety
    ///
    /// `node` must be a live value node of this list.
    pub unsafe fn move_to_back(&mut self, node: *mut Entry<T>) {
        // SAFETY: caller guarantees node is a value node of this list
        unsafe {
            if (*self.tail).prev == node {
                return;
            }
            self.detach(node);
            self.attach_back(node);
        }
    }

    /// Removes every item, dropping the values.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Iterates values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            // SAFETY: head is a valid sentinel for the lifetime of the list
            cur: unsafe { (*self.head).next },
            tail: self.tail,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Unlinks a node without deallocating it. Does not touch `len`.
    ///
    /// # Safety
    ///
    /// `node` must be a value node currently linked into this list.
    unsafe fn detach(&mut self, node: *mut Entry<T>) {
        // SAFETY: node is linked, so its neighbours are valid entries
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// Links a node right after the head sentinel. Does not touch `len`.
    ///
    /// # Safety
    ///
    /// `node` must be valid and not currently linked into this list.
    unsafe fn attach_front(&mut self, node: *mut Entry<T>) {
        // SAFETY: head is valid; caller guarantees node is valid and unlinked
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }

    /// Links a node right before the tail sentinel. Does not touch `len`.
    ///
    /// # Safety
    ///
    /// `node` must be valid and not currently linked into this list.
    unsafe fn attach_back(&mut self, node: *mut Entry<T>) {
        // SAFETY: tail is valid; caller guarantees node is valid and unlinked
        unsafe {
            (*node).next = self.tail;
            (*node).prev = (*self.tail).prev;
            (*self.tail).prev = node;
            (*(*node).prev).next = node;
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();

        // SAFETY: head and tail were allocated in `new` and are freed exactly once here.
        // Sentinel values are uninitialized, and MaybeUninit never drops its contents.
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over a [`List`].
pub struct Iter<'a, T> {
    cur: *mut Entry<T>,
    tail: *mut Entry<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cur == self.tail {
            return None;
        }
        // SAFETY: cur is a value node between the sentinels; the shared borrow
        // of the list keeps it alive for 'a
        unsafe {
            let value = (*self.cur).get_value();
            self.cur = (*self.cur).next;
            self.remaining -= 1;
            Some(value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}
